//! Converter contracts.
//!
//! Every pluggable converter implements [`RepresentationConverter`]; the
//! ones that can take part in chain resolution also implement
//! [`TypedRepresentationConverter`] to declare what they accept and produce.

use async_trait::async_trait;

use crate::preferences::ValuePreferences;
use crate::representation::Representation;

pub mod error;
pub use error::{ConversionError, ConversionResult};

pub mod typed;
pub use typed::{ensure_supported, supports_conversion};

/// Input of a single conversion request.
#[derive(Debug, Clone, Default)]
pub struct ConverterArgs {
    /// The representation to convert
    pub representation: Representation,
    /// Requested target types. Empty means "anything"
    pub preferences: ValuePreferences,
}

impl ConverterArgs {
    pub fn new(representation: Representation, preferences: ValuePreferences) -> Self {
        Self {
            representation,
            preferences,
        }
    }
}

/// A handler converting representations between media types.
#[async_trait]
pub trait RepresentationConverter: Send + Sync {
    /// Human-readable name used in logs and plans.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Checks whether this converter can handle the request.
    ///
    /// Performs no conversion work.
    async fn can_handle(&self, args: &ConverterArgs) -> ConversionResult<()>;

    /// Converts the representation.
    async fn handle(&self, args: ConverterArgs) -> ConversionResult<Representation>;

    /// [`can_handle`](Self::can_handle) followed by [`handle`](Self::handle).
    async fn handle_safe(&self, args: ConverterArgs) -> ConversionResult<Representation> {
        self.can_handle(&args).await?;
        self.handle(args).await
    }
}

/// A converter that declares the types it reads and writes.
///
/// Declarations may be costly to compute and may change over the lifetime
/// of the process, so callers fetch them per resolution rather than
/// holding on to them.
#[async_trait]
pub trait TypedRepresentationConverter: RepresentationConverter {
    /// Weighted patterns this converter accepts as input.
    async fn input_types(&self) -> ConversionResult<ValuePreferences>;

    /// Weighted patterns this converter can produce.
    async fn output_types(&self) -> ConversionResult<ValuePreferences>;
}
