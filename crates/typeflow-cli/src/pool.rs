//! Converter pool files
//!
//! A pool file configures the chained converter and lists the converters
//! it may chain:
//!
//! ```toml
//! [chain]
//! max_cache_size = 20
//!
//! [[replacers]]
//! name = "rdf-relabel"
//! rules = [{ from = "application/n-triples", to = ["text/turtle"] }]
//! ```
//!
//! Any field can be overridden from the environment, e.g.
//! `TYPEFLOW_CHAIN__MAX_CACHE_SIZE=5`.

use std::path::Path;
use std::sync::Arc;

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use tracing::debug;
use typeflow_foundation::{
    ChainedConverter, ChainedConverterConfig, ContentTypeReplacer, ReplacementRule,
};
use typeflow_kernel::TypedRepresentationConverter;
use typeflow_kernel::config::load_with_env;
use typeflow_kernel::error::{KernelError, KernelResult};

/// Environment prefix for pool overrides
pub const ENV_PREFIX: &str = "TYPEFLOW";

/// A content type replacer declared in a pool file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplacerDefinition {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<ReplacementRule>,
}

/// Contents of a pool file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    pub chain: ChainedConverterConfig,
    #[serde(default)]
    pub replacers: Vec<ReplacerDefinition>,
}

impl PoolConfig {
    /// Reads a pool file and applies environment overrides.
    pub fn load(path: &Path) -> KernelResult<Self> {
        let pool: Self = load_with_env(path, ENV_PREFIX)
            .map_err(KernelError::from)
            .attach(format!("reading pool file {}", path.display()))?;
        debug!(
            path = %path.display(),
            replacers = pool.replacers.len(),
            "pool loaded"
        );
        Ok(pool)
    }

    /// The pool members, in declaration order.
    pub fn converters(&self) -> Vec<Arc<dyn TypedRepresentationConverter>> {
        self.replacers
            .iter()
            .map(|def| {
                Arc::new(ContentTypeReplacer::new(def.name.clone(), def.rules.clone()))
                    as Arc<dyn TypedRepresentationConverter>
            })
            .collect()
    }

    /// Builds the chained converter for this pool.
    pub fn build(&self) -> KernelResult<ChainedConverter> {
        ChainedConverter::with_config(self.converters(), self.chain.clone())
            .map_err(|err| Report::new(KernelError::from(err)))
            .attach("building the chained converter")
    }
}
