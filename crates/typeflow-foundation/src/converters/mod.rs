//! General purpose converters.
//!
//! - [`ContentTypeReplacer`]: relabels content types without touching data
//! - [`IfNeededConverter`]: skips a wrapped converter when the input is
//!   already acceptable

pub mod if_needed;
pub mod replacer;

pub use if_needed::IfNeededConverter;
pub use replacer::{ContentTypeReplacer, ReplacementRule};
