//! The chained converter: resolve a path, then run it hop by hop.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use typeflow_kernel::preferences::ValuePreferences;
use typeflow_kernel::{
    ConversionError, ConversionResult, ConverterArgs, Representation, RepresentationConverter,
    TypedRepresentationConverter,
};

use super::cache::{PathCache, PathSignature};
use super::config::ChainedConverterConfig;
use super::finder::PathFinder;
use super::path::ConversionPath;

/// Converts representations by chaining converters from a pool.
///
/// Paths are found with [`PathFinder`] and remembered per request
/// signature in a [`PathCache`], so a repeated request does not query any
/// converter declarations again. Converters are shared read-only; the cache
/// is the only mutable state.
pub struct ChainedConverter {
    converters: Vec<Arc<dyn TypedRepresentationConverter>>,
    cache: PathCache,
}

impl ChainedConverter {
    /// Creates a chained converter with the default configuration.
    ///
    /// Fails when `converters` is empty.
    pub fn new(converters: Vec<Arc<dyn TypedRepresentationConverter>>) -> ConversionResult<Self> {
        Self::with_config(converters, ChainedConverterConfig::default())
    }

    pub fn with_config(
        converters: Vec<Arc<dyn TypedRepresentationConverter>>,
        config: ChainedConverterConfig,
    ) -> ConversionResult<Self> {
        if converters.is_empty() {
            return Err(ConversionError::empty_pool());
        }
        config.validate()?;

        info!(
            converters = converters.len(),
            max_cache_size = config.max_cache_size,
            "chained converter created"
        );
        Ok(Self {
            converters,
            cache: PathCache::new(config.max_cache_size),
        })
    }

    pub fn converters(&self) -> &[Arc<dyn TypedRepresentationConverter>] {
        &self.converters
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    /// Finds the path for a request, consulting the cache first.
    ///
    /// Only successful resolutions are cached.
    pub async fn resolve(&self, args: &ConverterArgs) -> ConversionResult<Arc<ConversionPath>> {
        let source_type = args
            .representation
            .content_type()
            .ok_or(ConversionError::MissingContentType)?;
        let targets = args.preferences.normalized();
        let key = PathSignature::new(source_type, &targets);

        if let Some(path) = self.cache.get(&key) {
            debug!(source_type, targets = %targets, "path cache hit");
            return Ok(path);
        }
        debug!(source_type, targets = %targets, "path cache miss");

        let path = Arc::new(
            PathFinder::new(&self.converters)
                .find(source_type, &targets)
                .await?,
        );
        self.cache.put(key, Arc::clone(&path));
        Ok(path)
    }

    /// Runs every hop of `path` in order.
    ///
    /// Each hop's `handle` is asked for exactly its chosen output type;
    /// `can_handle` is not consulted, so running a path fetches no
    /// declarations. Properties of the previous step are carried forward
    /// and the content type is set to the hop's output type.
    async fn execute(
        &self,
        path: &ConversionPath,
        mut representation: Representation,
    ) -> ConversionResult<Representation> {
        for (step, hop) in path.hops().iter().enumerate() {
            let previous = representation.metadata.clone();
            let args = ConverterArgs::new(
                representation,
                ValuePreferences::single(hop.out_type(), 1.0),
            );

            let mut converted = hop.converter().handle(args).await.map_err(|err| {
                warn!(
                    converter = hop.converter().name(),
                    step,
                    out_type = hop.out_type(),
                    error = %err,
                    "conversion step failed"
                );
                err
            })?;
            converted.metadata.inherit_from(&previous);
            converted.metadata.set_content_type(hop.out_type());
            representation = converted;
        }
        Ok(representation)
    }
}

#[async_trait]
impl RepresentationConverter for ChainedConverter {
    fn name(&self) -> &str {
        "ChainedConverter"
    }

    async fn can_handle(&self, args: &ConverterArgs) -> ConversionResult<()> {
        self.resolve(args).await.map(|_| ())
    }

    async fn handle(&self, args: ConverterArgs) -> ConversionResult<Representation> {
        let path = self.resolve(&args).await?;
        if path.is_empty() {
            return Ok(args.representation);
        }
        debug!(%path, "executing conversion path");
        self.execute(&path, args.representation).await
    }
}

impl std::fmt::Debug for ChainedConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.converters.iter().map(|c| c.name()).collect();
        f.debug_struct("ChainedConverter")
            .field("converters", &names)
            .field("cache", &self.cache)
            .finish()
    }
}
