//! Crate-level error types for `typeflow-kernel`.
//!
//! Provides a unified [`KernelError`] that composes errors from every
//! sub-module (conversion, config, IO, serialization) together with
//! [`error_stack::Report`] for context-carrying propagation in outer layers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use typeflow_kernel::error::{KernelError, KernelResult};
//! use error_stack::ResultExt;
//!
//! fn read_pool() -> KernelResult<String> {
//!     let raw = std::fs::read_to_string("pool.toml")
//!         .map_err(KernelError::from)
//!         .map_err(error_stack::Report::new)
//!         .attach("loading pool.toml")?;
//!     Ok(raw)
//! }
//! ```

use thiserror::Error;

use crate::converter::ConversionError;

/// Crate-level error type for `typeflow-kernel`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KernelError {
    /// Resolving or executing a conversion failed.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// A configuration-related error (requires the `config` feature).
    #[cfg(feature = "config")]
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A low-level I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal / untyped error described by a message string.
    #[error("{0}")]
    Internal(String),
}

/// Convenience result alias using [`error_stack::Report`].
pub type KernelResult<T> = Result<T, error_stack::Report<KernelError>>;
