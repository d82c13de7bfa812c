//! Content type replacement.
//!
//! Some formats are byte-compatible with others (`application/n-triples`
//! is valid `text/turtle`, any `text/*` is `text/plain`), so converting is
//! only a matter of changing the label.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use typeflow_kernel::media_type::matches_media_type;
use typeflow_kernel::preferences::{ValuePreferences, conversion_target};
use typeflow_kernel::{
    ConversionError, ConversionResult, ConverterArgs, Representation, RepresentationConverter,
    TypedRepresentationConverter,
};

/// Types `from` may be relabeled as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    /// Input pattern, wildcards allowed
    pub from: String,
    /// Replacement types, in order of preference
    pub to: Vec<String>,
}

impl ReplacementRule {
    pub fn new(from: impl Into<String>, to: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            from: from.into(),
            to: to.into_iter().map(Into::into).collect(),
        }
    }
}

/// Replaces the content type of a representation, leaving data untouched.
#[derive(Debug, Clone)]
pub struct ContentTypeReplacer {
    name: String,
    rules: Vec<ReplacementRule>,
}

impl ContentTypeReplacer {
    pub fn new(name: impl Into<String>, rules: Vec<ReplacementRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    /// The replacement for `content_type` the preferences value most.
    fn replacement(&self, content_type: &str, preferences: &ValuePreferences) -> ConversionResult<String> {
        let supported: ValuePreferences = self
            .rules
            .iter()
            .filter(|rule| matches_media_type(&rule.from, content_type))
            .flat_map(|rule| rule.to.iter().map(|to| (to.as_str(), 1.0)))
            .collect();

        conversion_target(&supported, &preferences.normalized()).ok_or_else(|| {
            ConversionError::Unsupported(format!(
                "Cannot convert from {} to {}.",
                content_type,
                preferences.joined_patterns()
            ))
        })
    }
}

#[async_trait]
impl RepresentationConverter for ContentTypeReplacer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn can_handle(&self, args: &ConverterArgs) -> ConversionResult<()> {
        let content_type = args
            .representation
            .content_type()
            .ok_or(ConversionError::MissingContentType)?;
        self.replacement(content_type, &args.preferences).map(|_| ())
    }

    async fn handle(&self, args: ConverterArgs) -> ConversionResult<Representation> {
        let content_type = args
            .representation
            .content_type()
            .ok_or(ConversionError::MissingContentType)?;
        let target = self.replacement(content_type, &args.preferences)?;
        Ok(args.representation.relabeled(target))
    }
}

#[async_trait]
impl TypedRepresentationConverter for ContentTypeReplacer {
    async fn input_types(&self) -> ConversionResult<ValuePreferences> {
        Ok(self.rules.iter().map(|rule| (rule.from.as_str(), 1.0)).collect())
    }

    async fn output_types(&self) -> ConversionResult<ValuePreferences> {
        Ok(self
            .rules
            .iter()
            .flat_map(|rule| rule.to.iter().map(|to| (to.as_str(), 1.0)))
            .collect())
    }
}
