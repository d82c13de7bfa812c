//! Media-type patterns and the matcher used by every preference lookup.
//!
//! A pattern is a `major/minor` token where the minor part, or both parts,
//! may be the `*` wildcard:
//!
//! - `text/turtle` matches only `text/turtle`
//! - `text/*` matches any type whose major part is `text`
//! - `*/*` matches everything
//!
//! Anything else (missing slash, empty parts, `*/minor`) is malformed and
//! never matches.

use std::fmt;

/// The wildcard marker used in either part of a pattern.
pub const WILDCARD: &str = "*";

/// The full wildcard pattern.
pub const ANY_MEDIA_TYPE: &str = "*/*";

/// Content type of the internal, already-parsed representation form.
///
/// Always appended to the target list of "no conversion path" diagnostics.
pub const INTERNAL_QUADS: &str = "internal/quads";

/// A parsed `major/minor` pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaRange<'a> {
    major: &'a str,
    minor: &'a str,
}

impl<'a> MediaRange<'a> {
    /// Parses a pattern, returning `None` for malformed input.
    pub fn parse(value: &'a str) -> Option<Self> {
        let (major, minor) = value.trim().split_once('/')?;
        if major.is_empty() || minor.is_empty() || minor.contains('/') {
            return None;
        }
        // `*/minor` is not a valid range
        if major == WILDCARD && minor != WILDCARD {
            return None;
        }
        Some(Self { major, minor })
    }

    pub fn major(&self) -> &'a str {
        self.major
    }

    pub fn minor(&self) -> &'a str {
        self.minor
    }

    /// Whether either part is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.minor == WILDCARD
    }

    /// Tests this range against another parsed type.
    pub fn matches(&self, other: &MediaRange<'_>) -> bool {
        if self.major == WILDCARD {
            return true;
        }
        if !self.major.eq_ignore_ascii_case(other.major) {
            return false;
        }
        self.minor == WILDCARD || self.minor.eq_ignore_ascii_case(other.minor)
    }
}

impl fmt::Display for MediaRange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.major, self.minor)
    }
}

/// Tests whether `media_type` matches `pattern`.
///
/// Malformed input on either side is simply non-matching.
pub fn matches_media_type(pattern: &str, media_type: &str) -> bool {
    match (MediaRange::parse(pattern), MediaRange::parse(media_type)) {
        (Some(pattern), Some(media_type)) => pattern.matches(&media_type),
        _ => false,
    }
}
