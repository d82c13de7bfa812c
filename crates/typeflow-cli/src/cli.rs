//! CLI command definitions using clap

use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Typeflow CLI - plan and run content-type conversion chains
#[derive(Parser)]
#[command(name = "typeflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, table)
    #[arg(short = 'o', long, global = true, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the conversion path for a request and print it
    Plan(RequestArgs),

    /// Convert a file through the resolved chain
    Convert {
        #[command(flatten)]
        request: RequestArgs,

        /// File holding the data to convert
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Arguments shared by every command that resolves a path.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Converter pool file (yaml, toml, json, ini, ron or json5)
    #[arg(short, long, env = "TYPEFLOW_POOL")]
    pub pool: PathBuf,

    /// Content type of the input
    #[arg(short, long)]
    pub from: String,

    /// Accepted pattern with an optional weight, e.g. `text/*=0.8`
    #[arg(short, long = "accept", value_parser = parse_accept)]
    pub accept: Vec<(String, f64)>,
}

/// Parses `pattern[=weight]`; the weight defaults to 1.
pub fn parse_accept(value: &str) -> Result<(String, f64), String> {
    let (pattern, weight) = match value.rsplit_once('=') {
        Some((pattern, weight)) => {
            let weight: f64 = weight
                .trim()
                .parse()
                .map_err(|_| format!("invalid weight '{weight}'"))?;
            (pattern.trim(), weight)
        }
        None => (value.trim(), 1.0),
    };

    if pattern.is_empty() {
        return Err("missing media type pattern".to_string());
    }
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight must be a non-negative number, got {weight}"));
    }
    Ok((pattern.to_string(), weight))
}
