// chain module - path resolution, path cache and chained execution
pub mod chain;

// converters module - general purpose converters
pub mod converters;

pub use chain::{
    ChainedConverter, ChainedConverterConfig, ConversionHop, ConversionPath, PathCache,
    PathCacheStats, PathFinder, PathSignature,
};
pub use converters::{ContentTypeReplacer, IfNeededConverter, ReplacementRule};
