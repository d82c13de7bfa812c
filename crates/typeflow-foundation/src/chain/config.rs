//! Chained converter configuration.

use serde::{Deserialize, Serialize};
use typeflow_kernel::{ConversionError, ConversionResult};

/// Default number of solved paths kept per chained converter.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 50;

/// Configuration for a [`ChainedConverter`](super::ChainedConverter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainedConverterConfig {
    /// Maximum number of solved paths kept in the LRU cache
    pub max_cache_size: usize,
}

impl Default for ChainedConverterConfig {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
        }
    }
}

impl ChainedConverterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path cache capacity
    pub fn with_max_cache_size(mut self, max_cache_size: usize) -> Self {
        self.max_cache_size = max_cache_size;
        self
    }

    /// Rejects settings the converter cannot run with.
    pub fn validate(&self) -> ConversionResult<()> {
        if self.max_cache_size == 0 {
            return Err(ConversionError::Configuration(
                "The path cache must hold at least 1 path.".to_string(),
            ));
        }
        Ok(())
    }
}
