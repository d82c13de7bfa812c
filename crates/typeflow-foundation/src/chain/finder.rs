//! Shortest-then-heaviest search over converter declarations.
//!
//! The search runs breadth first over media types. Layer `k` holds the
//! types reachable with exactly `k` converters that were not reachable with
//! fewer. For each new type only the heaviest path reaching it is kept,
//! which is enough because a path's score is a product of per-hop weights.
//! The first layer containing an accepted type ends the search; within it
//! the path maximizing `hop weights × terminal preference` wins, the
//! earliest discovered one on ties.
//!
//! Declarations are fetched lazily, once per converter per search: input
//! types the first time a converter is tried against a frontier type,
//! output types the first time its input side matches.
//!
//! Types are compared case-insensitively, so `Text/Turtle` and
//! `text/turtle` are the same node.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, trace};
use typeflow_kernel::preferences::ValuePreferences;
use typeflow_kernel::{ConversionError, ConversionResult, TypedRepresentationConverter};

use super::path::{ConversionHop, ConversionPath};

/// Finds conversion paths through a pool of typed converters.
pub struct PathFinder<'a> {
    converters: &'a [Arc<dyn TypedRepresentationConverter>],
}

/// Identity of a media type as a search node.
fn node_key(media_type: &str) -> String {
    media_type.to_ascii_lowercase()
}

/// A path under construction.
#[derive(Clone)]
struct PartialPath {
    node: String,
    hops: Vec<ConversionHop>,
    weight: f64,
}

impl PartialPath {
    fn extend(&self, hop: ConversionHop) -> Self {
        let mut hops = self.hops.clone();
        let weight = self.weight * hop.weight();
        let node = hop.out_type().to_string();
        hops.push(hop);
        Self { node, hops, weight }
    }
}

/// Declarations fetched so far during one search.
struct Declarations {
    inputs: Vec<Option<ValuePreferences>>,
    outputs: Vec<Option<ValuePreferences>>,
}

impl Declarations {
    fn new(len: usize) -> Self {
        Self {
            inputs: vec![None; len],
            outputs: vec![None; len],
        }
    }

    /// Best input pattern of `converter` accepting `node`.
    async fn input_match(
        &mut self,
        index: usize,
        converter: &dyn TypedRepresentationConverter,
        node: &str,
    ) -> ConversionResult<Option<(String, f64)>> {
        if self.inputs[index].is_none() {
            self.inputs[index] = Some(converter.input_types().await?);
        }
        Ok(self.inputs[index]
            .as_ref()
            .and_then(|inputs| inputs.best_match(node))
            .map(|(pattern, weight)| (pattern.to_string(), weight)))
    }

    async fn outputs(
        &mut self,
        index: usize,
        converter: &dyn TypedRepresentationConverter,
    ) -> ConversionResult<ValuePreferences> {
        match &self.outputs[index] {
            Some(outputs) => Ok(outputs.clone()),
            None => {
                let outputs = converter.output_types().await?;
                self.outputs[index] = Some(outputs.clone());
                Ok(outputs)
            }
        }
    }
}

impl<'a> PathFinder<'a> {
    pub fn new(converters: &'a [Arc<dyn TypedRepresentationConverter>]) -> Self {
        Self { converters }
    }

    /// Finds the best path from `source_type` to something `targets`
    /// accepts.
    ///
    /// `targets` must already be normalized. Fails with
    /// [`ConversionError::NoPath`] when no accepted type is reachable.
    pub async fn find(
        &self,
        source_type: &str,
        targets: &ValuePreferences,
    ) -> ConversionResult<ConversionPath> {
        if let Some((pattern, weight)) = targets.best_match(source_type) {
            debug!(source_type, pattern, "source type already acceptable");
            return Ok(ConversionPath::empty(source_type, weight));
        }

        let mut declarations = Declarations::new(self.converters.len());
        let mut visited = HashSet::from([node_key(source_type)]);
        let mut frontier = vec![PartialPath {
            node: source_type.to_string(),
            hops: Vec::new(),
            weight: 1.0,
        }];
        let mut depth = 0usize;

        while !frontier.is_empty() {
            depth += 1;
            let layer = self
                .expand(&frontier, &visited, &mut declarations)
                .await?;
            trace!(depth, reached = layer.len(), "expanded search layer");

            if let Some(path) = Self::best_accepted(source_type, &layer, targets) {
                debug!(%path, depth, "conversion path found");
                return Ok(path);
            }

            visited.extend(layer.iter().map(|partial| node_key(&partial.node)));
            frontier = layer;
        }

        debug!(source_type, targets = %targets, "no conversion path");
        Err(ConversionError::no_path(source_type, targets))
    }

    /// Builds the next layer from the current frontier.
    ///
    /// Keeps one path per newly reached type, in discovery order.
    /// `visited` holds node keys.
    async fn expand(
        &self,
        frontier: &[PartialPath],
        visited: &HashSet<String>,
        declarations: &mut Declarations,
    ) -> ConversionResult<Vec<PartialPath>> {
        let mut layer: Vec<PartialPath> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for partial in frontier {
            for (index, converter) in self.converters.iter().enumerate() {
                let Some((in_type, in_weight)) = declarations
                    .input_match(index, converter.as_ref(), &partial.node)
                    .await?
                else {
                    continue;
                };
                let outputs = declarations.outputs(index, converter.as_ref()).await?;

                for (out_type, out_weight) in outputs.iter() {
                    let key = node_key(out_type);
                    if out_weight <= 0.0 || visited.contains(&key) {
                        continue;
                    }
                    let hop = ConversionHop::new(
                        Arc::clone(converter),
                        in_type.clone(),
                        out_type,
                        in_weight * out_weight,
                    );
                    trace!(
                        converter = converter.name(),
                        from = %partial.node,
                        to = out_type,
                        weight = hop.weight(),
                        "edge"
                    );

                    match positions.get(&key) {
                        Some(&position) => {
                            if partial.weight * hop.weight() > layer[position].weight {
                                layer[position] = partial.extend(hop);
                            }
                        }
                        None => {
                            positions.insert(key, layer.len());
                            layer.push(partial.extend(hop));
                        }
                    }
                }
            }
        }

        Ok(layer)
    }

    /// The highest scoring accepted path of a layer.
    fn best_accepted(
        source_type: &str,
        layer: &[PartialPath],
        targets: &ValuePreferences,
    ) -> Option<ConversionPath> {
        let mut best: Option<(&PartialPath, f64)> = None;
        for partial in layer {
            let Some((_, terminal)) = targets.best_match(&partial.node) else {
                continue;
            };
            let score = partial.weight * terminal;
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((partial, score));
            }
        }
        best.map(|(partial, score)| ConversionPath::new(source_type, partial.hops.clone(), score))
    }
}
