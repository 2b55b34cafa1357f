use thiserror::Error;

use crate::core::io::pdb::PdbError;
use crate::engine::config::ConfigError;

/// Failures that abort the whole pipeline.
///
/// Per-tool execution failures are deliberately absent: they are recovered
/// locally inside each runner and surface as all-`None` result records.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Structure input error: {source}")]
    Parse {
        #[from]
        source: PdbError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
