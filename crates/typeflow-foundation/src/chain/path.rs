//! Resolved conversion chains.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use typeflow_kernel::TypedRepresentationConverter;

/// One converter invocation inside a chain.
#[derive(Clone)]
pub struct ConversionHop {
    converter: Arc<dyn TypedRepresentationConverter>,
    in_type: String,
    out_type: String,
    weight: f64,
}

impl ConversionHop {
    pub fn new(
        converter: Arc<dyn TypedRepresentationConverter>,
        in_type: impl Into<String>,
        out_type: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            converter,
            in_type: in_type.into(),
            out_type: out_type.into(),
            weight,
        }
    }

    pub fn converter(&self) -> &Arc<dyn TypedRepresentationConverter> {
        &self.converter
    }

    /// The input pattern that matched the incoming type.
    pub fn in_type(&self) -> &str {
        &self.in_type
    }

    /// The output pattern this hop is forced to produce.
    pub fn out_type(&self) -> &str {
        &self.out_type
    }

    /// `input weight × output weight`.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Debug for ConversionHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionHop")
            .field("converter", &self.converter.name())
            .field("in_type", &self.in_type)
            .field("out_type", &self.out_type)
            .field("weight", &self.weight)
            .finish()
    }
}

/// An ordered chain of hops solving one request.
///
/// A path without hops means the representation is already acceptable.
/// Paths are immutable once built and shared between cache hits.
#[derive(Debug, Clone)]
pub struct ConversionPath {
    source_type: String,
    target_type: String,
    hops: Vec<ConversionHop>,
    score: f64,
}

impl ConversionPath {
    /// The "no conversion needed" path.
    pub fn empty(source_type: impl Into<String>, score: f64) -> Self {
        let source_type = source_type.into();
        Self {
            target_type: source_type.clone(),
            source_type,
            hops: Vec::new(),
            score,
        }
    }

    /// A path through the given non-empty hops.
    ///
    /// `score` is the product of hop weights times the terminal preference.
    pub fn new(source_type: impl Into<String>, hops: Vec<ConversionHop>, score: f64) -> Self {
        let source_type = source_type.into();
        let target_type = hops
            .last()
            .map(|hop| hop.out_type.clone())
            .unwrap_or_else(|| source_type.clone());
        Self {
            source_type,
            target_type,
            hops,
            score,
        }
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// The type the chain produces.
    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn hops(&self) -> &[ConversionHop] {
        &self.hops
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// A serializable description of the chain.
    pub fn plan(&self) -> PathPlan {
        PathPlan {
            source_type: self.source_type.clone(),
            target_type: self.target_type.clone(),
            score: self.score,
            hops: self
                .hops
                .iter()
                .map(|hop| HopPlan {
                    converter: hop.converter.name().to_string(),
                    in_type: hop.in_type.clone(),
                    out_type: hop.out_type.clone(),
                    weight: hop.weight,
                })
                .collect(),
        }
    }
}

impl fmt::Display for ConversionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_type)?;
        for hop in &self.hops {
            write!(f, " -[{}]-> {}", hop.converter.name(), hop.out_type)?;
        }
        write!(f, " (score {:.4})", self.score)
    }
}

/// Serializable view of a [`ConversionPath`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPlan {
    pub source_type: String,
    pub target_type: String,
    pub score: f64,
    pub hops: Vec<HopPlan>,
}

/// Serializable view of a [`ConversionHop`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopPlan {
    pub converter: String,
    pub in_type: String,
    pub out_type: String,
    pub weight: f64,
}
