//! Representation data model.
//!
//! Only the content type is interpreted by the conversion core; everything
//! else travels along untouched.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Metadata describing a representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepresentationMetadata {
    /// Current concrete media type, if known
    #[serde(default)]
    pub content_type: Option<String>,
    /// Free-form properties carried through every conversion step
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl RepresentationMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.content_type = Some(content_type.into());
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Copies every property of `previous` that is missing here.
    ///
    /// The content type is left alone.
    pub fn inherit_from(&mut self, previous: &RepresentationMetadata) {
        for (key, value) in &previous.properties {
            self.properties
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
}

/// A piece of data together with its metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Representation {
    pub metadata: RepresentationMetadata,
    pub data: Bytes,
    /// Whether `data` holds raw bytes rather than parsed objects
    pub binary: bool,
}

impl Representation {
    pub fn new(metadata: RepresentationMetadata, data: impl Into<Bytes>) -> Self {
        Self {
            metadata,
            data: data.into(),
            binary: true,
        }
    }

    /// Shorthand for a binary representation of the given type.
    pub fn typed(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(
            RepresentationMetadata::new().with_content_type(content_type),
            data,
        )
    }

    pub fn content_type(&self) -> Option<&str> {
        self.metadata.content_type()
    }

    /// Same data and properties under a different content type.
    pub fn relabeled(mut self, content_type: impl Into<String>) -> Self {
        self.metadata.set_content_type(content_type);
        self
    }
}
