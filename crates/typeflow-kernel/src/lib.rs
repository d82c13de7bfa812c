// media type module
pub mod media_type;
pub use media_type::{INTERNAL_QUADS, MediaRange, matches_media_type};

// preferences module
pub mod preferences;
pub use preferences::ValuePreferences;

// representation module
pub mod representation;
pub use representation::{Representation, RepresentationMetadata};

// converter module
pub mod converter;
pub use converter::*;

// config module
#[cfg(feature = "config")]
pub mod config;

// error module
pub mod error;
