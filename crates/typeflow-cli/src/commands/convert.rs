//! `typeflow convert` command implementation

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;
use typeflow_kernel::{Representation, RepresentationConverter};

use crate::cli::RequestArgs;
use crate::output::{OutputFormat, to_json};

/// JSON view of a converted representation.
#[derive(Debug, Serialize)]
struct ConvertOutput<'a> {
    content_type: Option<&'a str>,
    properties: &'a BTreeMap<String, serde_json::Value>,
    size: usize,
    data: String,
}

impl<'a> From<&'a Representation> for ConvertOutput<'a> {
    fn from(representation: &'a Representation) -> Self {
        Self {
            content_type: representation.content_type(),
            properties: &representation.metadata.properties,
            size: representation.data.len(),
            data: String::from_utf8_lossy(&representation.data).into_owned(),
        }
    }
}

/// Execute the `typeflow convert` command
///
/// Data goes to stdout as raw bytes, or wrapped in a JSON document with
/// `--output json`.
pub async fn run(request: &RequestArgs, input: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let data = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let chain = super::load_chain(request)?;

    let result = chain
        .handle_safe(super::converter_args(request, data))
        .await?;
    info!(
        content_type = result.content_type().unwrap_or_default(),
        bytes = result.data.len(),
        "conversion finished"
    );

    match format {
        OutputFormat::Json => println!("{}", to_json(&ConvertOutput::from(&result))?),
        OutputFormat::Text | OutputFormat::Table => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&result.data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
