//! Conditional conversion.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;
use typeflow_kernel::{ConversionResult, ConverterArgs, Representation, RepresentationConverter};

/// Runs the wrapped converter only when the representation is not already
/// acceptable.
///
/// Requests without preferences, or whose content type already matches a
/// preference, are passed through untouched.
pub struct IfNeededConverter {
    converter: Arc<dyn RepresentationConverter>,
}

impl IfNeededConverter {
    pub fn new(converter: Arc<dyn RepresentationConverter>) -> Self {
        Self { converter }
    }

    fn needs_conversion(args: &ConverterArgs) -> bool {
        if args.preferences.is_empty() {
            return false;
        }
        match args.representation.content_type() {
            Some(content_type) => !args.preferences.accepts(content_type),
            None => true,
        }
    }
}

#[async_trait]
impl RepresentationConverter for IfNeededConverter {
    fn name(&self) -> &str {
        "IfNeededConverter"
    }

    async fn can_handle(&self, args: &ConverterArgs) -> ConversionResult<()> {
        if Self::needs_conversion(args) {
            self.converter.can_handle(args).await
        } else {
            Ok(())
        }
    }

    async fn handle(&self, args: ConverterArgs) -> ConversionResult<Representation> {
        if !Self::needs_conversion(&args) {
            trace!(content_type = ?args.representation.content_type(), "conversion not needed");
            return Ok(args.representation);
        }
        self.converter.handle(args).await
    }

    async fn handle_safe(&self, args: ConverterArgs) -> ConversionResult<Representation> {
        if !Self::needs_conversion(&args) {
            return Ok(args.representation);
        }
        self.converter.handle_safe(args).await
    }
}
