//! Command implementations

pub mod convert;
pub mod plan;

use error_stack::Report;
use typeflow_foundation::ChainedConverter;
use typeflow_kernel::error::KernelError;
use typeflow_kernel::{ConverterArgs, Representation, ValuePreferences};

use crate::cli::RequestArgs;
use crate::pool::PoolConfig;

/// Loads the pool named by the request and builds its chained converter.
pub(crate) fn load_chain(request: &RequestArgs) -> anyhow::Result<ChainedConverter> {
    PoolConfig::load(&request.pool)
        .and_then(|pool| pool.build())
        .map_err(into_cli_error)
}

/// Conversion errors surface with their own message; anything else keeps
/// the full report.
fn into_cli_error(report: Report<KernelError>) -> anyhow::Error {
    match report.current_context() {
        KernelError::Conversion(err) => anyhow::Error::new(err.clone()),
        _ => anyhow::anyhow!("{report:?}"),
    }
}

/// The conversion request described by the command line.
pub(crate) fn converter_args(request: &RequestArgs, data: Vec<u8>) -> ConverterArgs {
    let preferences: ValuePreferences = request.accept.iter().cloned().collect();
    ConverterArgs::new(Representation::typed(request.from.as_str(), data), preferences)
}
