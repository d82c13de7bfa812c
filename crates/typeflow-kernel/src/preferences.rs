//! Weighted media-type preferences.
//!
//! A [`ValuePreferences`] maps type patterns to a weight in `[0, 1]`. It is
//! used for requester targets as well as for converter input/output
//! declarations. Insertion order is preserved; it only influences
//! diagnostics and tie-breaks, never which weights apply.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::media_type::{ANY_MEDIA_TYPE, matches_media_type};

/// Ordered mapping from type pattern to weight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuePreferences {
    entries: Vec<(String, f64)>,
}

impl ValuePreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set containing exactly one pattern.
    pub fn single(pattern: impl Into<String>, weight: f64) -> Self {
        Self {
            entries: vec![(pattern.into(), weight)],
        }
    }

    /// The `{ "*/*": 1 }` set that absent preferences stand for.
    pub fn any() -> Self {
        Self::single(ANY_MEDIA_TYPE, 1.0)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, pattern: impl Into<String>, weight: f64) -> Self {
        self.insert(pattern, weight);
        self
    }

    /// Sets the weight of a pattern.
    ///
    /// An existing pattern keeps its position and gets the new weight.
    pub fn insert(&mut self, pattern: impl Into<String>, weight: f64) {
        let pattern = pattern.into();
        match self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((pattern, weight)),
        }
    }

    /// The weight stored for this exact pattern.
    pub fn get(&self, pattern: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, w)| *w)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(p, w)| (p.as_str(), *w))
    }

    /// Patterns in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    /// Patterns joined with `,`, as used in error messages.
    pub fn joined_patterns(&self) -> String {
        self.patterns().collect::<Vec<_>>().join(",")
    }

    /// Returns the set itself, or `{ "*/*": 1 }` when it is empty.
    pub fn normalized(&self) -> Self {
        if self.is_empty() {
            Self::any()
        } else {
            self.clone()
        }
    }

    /// Whether `media_type` is acceptable with a positive weight.
    pub fn accepts(&self, media_type: &str) -> bool {
        type_weight(self, media_type) > 0.0
    }

    /// The best positive entry matching `media_type`, if any.
    ///
    /// The first entry wins among equal weights.
    pub fn best_match(&self, media_type: &str) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (pattern, weight) in self.iter() {
            if weight <= 0.0 || !matches_media_type(pattern, media_type) {
                continue;
            }
            if best.is_none_or(|(_, current)| weight > current) {
                best = Some((pattern, weight));
            }
        }
        best
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ValuePreferences {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut preferences = Self::new();
        for (pattern, weight) in iter {
            preferences.insert(pattern, weight);
        }
        preferences
    }
}

impl fmt::Display for ValuePreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .entries
            .iter()
            .map(|(p, w)| format!("{p};q={w}"))
            .collect();
        write!(f, "{}", rendered.join(", "))
    }
}

impl Serialize for ValuePreferences {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (pattern, weight) in &self.entries {
            map.serialize_entry(pattern, weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValuePreferences {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PreferencesVisitor;

        impl<'de> Visitor<'de> for PreferencesVisitor {
            type Value = ValuePreferences;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of media type patterns to weights")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut preferences = ValuePreferences::new();
                while let Some((pattern, weight)) = access.next_entry::<String, f64>()? {
                    preferences.insert(pattern, weight);
                }
                Ok(preferences)
            }
        }

        deserializer.deserialize_map(PreferencesVisitor)
    }
}

/// Weight of `media_type` under `preferences`.
///
/// This is the highest positive weight among matching patterns, or `0` when
/// nothing matches. Entries with weight `<= 0` never match.
pub fn type_weight(preferences: &ValuePreferences, media_type: &str) -> f64 {
    preferences
        .best_match(media_type)
        .map(|(_, weight)| weight)
        .unwrap_or(0.0)
}

/// Picks the available output type the requester values most.
///
/// Each candidate scores `available weight × type_weight(preferred)`. The
/// first candidate wins ties; `None` when every score is zero.
pub fn conversion_target(available: &ValuePreferences, preferred: &ValuePreferences) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (media_type, weight) in available.iter() {
        let score = weight * type_weight(preferred, media_type);
        if score > 0.0 && best.is_none_or(|(_, current)| score > current) {
            best = Some((media_type, score));
        }
    }
    best.map(|(media_type, _)| media_type.to_string())
}

/// Drops inert entries (`weight <= 0`) and clamps weights above 1.
pub fn clean_preferences(preferences: &ValuePreferences) -> ValuePreferences {
    preferences
        .iter()
        .filter(|(_, weight)| *weight > 0.0)
        .map(|(pattern, weight)| (pattern, weight.min(1.0)))
        .collect()
}
