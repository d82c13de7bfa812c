//! Typeflow Testing Framework
//!
//! Provides recording converters for testing chain resolution and
//! execution without real format conversions.


pub use converter::MockConverter;
pub use typeflow_kernel::RepresentationConverter;
