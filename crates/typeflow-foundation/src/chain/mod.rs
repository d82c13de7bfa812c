//! Converter chaining
//!
//! Resolves how to turn a representation into something the requester
//! accepts when no single converter can do it, then runs the chain.
//!
//! # Architecture
//!
//! ```text
//! ChainedConverter::handle
//!    |
//!    +--> PathCache::get ----------- hit ----------+
//!    |        | miss                               |
//!    |        v                                    |
//!    |    PathFinder::find (layered search)        |
//!    |        |                                    |
//!    |        v                                    |
//!    |    PathCache::put                           |
//!    |                                             v
//!    +--> hop 1 -> hop 2 -> ... -> hop n  (each forced to its chosen type)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use typeflow_foundation::chain::{ChainedConverter, ChainedConverterConfig};
//! use typeflow_kernel::{ConverterArgs, Representation, RepresentationConverter, ValuePreferences};
//!
//! let chain = ChainedConverter::with_config(converters, ChainedConverterConfig::new().with_max_cache_size(10))?;
//! let args = ConverterArgs::new(Representation::typed("text/turtle", data), ValuePreferences::single("application/ld+json", 1.0));
//! let converted = chain.handle_safe(args).await?;
//! ```

pub mod cache;
pub mod config;
pub mod converter;
pub mod finder;
pub mod path;

pub use cache::{PathCache, PathCacheStats, PathSignature};
pub use config::{ChainedConverterConfig, DEFAULT_MAX_CACHE_SIZE};
pub use converter::ChainedConverter;
pub use finder::PathFinder;
pub use path::{ConversionHop, ConversionPath, HopPlan, PathPlan};
