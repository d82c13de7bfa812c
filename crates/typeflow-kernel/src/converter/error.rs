//! Typed errors for the conversion sub-system.

use thiserror::Error;

use crate::media_type::INTERNAL_QUADS;
use crate::preferences::ValuePreferences;

/// Errors raised while resolving or executing a conversion.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum ConversionError {
    /// Invalid construction parameters, such as an empty converter pool.
    #[error("{0}")]
    Configuration(String),

    /// The representation carries no content type.
    #[error("Missing Content-Type header.")]
    MissingContentType,

    /// No chain of converters reaches an accepted type.
    #[error("No conversion path could be made from {source_type} to {targets}.")]
    NoPath {
        /// The representation's current type.
        source_type: String,
        /// Accepted patterns in preference order, followed by the internal type.
        targets: String,
    },

    /// A converter was asked for a conversion it does not declare.
    #[error("{0}")]
    Unsupported(String),

    /// A converter failed while executing.
    #[error("Conversion failed: {0}")]
    ExecutionFailed(String),

    /// Catch-all for errors that don't fit the above categories.
    #[error("{0}")]
    Internal(String),
}

impl ConversionError {
    /// The error raised for an empty converter pool.
    pub fn empty_pool() -> Self {
        Self::Configuration("At least 1 converter is required.".to_string())
    }

    /// Builds a [`NoPath`](Self::NoPath) listing every accepted pattern.
    pub fn no_path(source_type: &str, preferences: &ValuePreferences) -> Self {
        let mut targets: Vec<&str> = preferences.patterns().collect();
        targets.push(INTERNAL_QUADS);
        Self::NoPath {
            source_type: source_type.to_string(),
            targets: targets.join(","),
        }
    }

    /// The refusal a typed converter reports for undeclared types.
    pub fn unsupported(inputs: &ValuePreferences, outputs: &ValuePreferences) -> Self {
        Self::Unsupported(format!(
            "Can only convert from {} to {}.",
            inputs.joined_patterns(),
            outputs.joined_patterns()
        ))
    }

    /// HTTP status class a hosting server would answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingContentType => 400,
            Self::NoPath { .. } | Self::Unsupported(_) => 501,
            _ => 500,
        }
    }
}

/// Conversion result type using the typed [`ConversionError`].
pub type ConversionResult<T> = Result<T, ConversionError>;
