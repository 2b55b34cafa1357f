//! Tool-paths configuration file.
//!
//! ```toml
//! [tools]
//! evoef2_binary = "/opt/EvoEF2/EvoEF2"
//! dfire2_dir = "/opt/dfire2"
//! rosetta_binary = "/opt/rosetta/score_jd2"
//! aggrescan3d_script = "/opt/a3d/run.py"
//! python_binary = "python2"        # optional
//! max_run_time_secs = 600          # optional
//! ```

use crate::error::{CliError, Result};
use proteval::engine::config::{MetricsConfig, MetricsConfigBuilder};
use proteval::engine::error::EngineError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ToolsFile {
    tools: ToolsSection,
}

#[derive(Debug, Deserialize)]
struct ToolsSection {
    evoef2_binary: PathBuf,
    dfire2_dir: PathBuf,
    rosetta_binary: PathBuf,
    aggrescan3d_script: PathBuf,
    python_binary: Option<PathBuf>,
    max_run_time_secs: Option<u64>,
}

/// Loads the tool-paths file and builds the pipeline configuration. A
/// command-line timeout override takes precedence over the file's value.
pub fn load_metrics_config(path: &Path, timeout_override: Option<u64>) -> Result<MetricsConfig> {
    let text = fs::read_to_string(path)?;
    let file: ToolsFile = toml::from_str(&text).map_err(|source| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    })?;

    let mut builder = MetricsConfigBuilder::new()
        .evoef2_binary(file.tools.evoef2_binary)
        .dfire2_dir(file.tools.dfire2_dir)
        .rosetta_binary(file.tools.rosetta_binary)
        .aggrescan3d_script(file.tools.aggrescan3d_script);
    if let Some(python) = file.tools.python_binary {
        builder = builder.python_binary(python);
    }
    if let Some(seconds) = timeout_override.or(file.tools.max_run_time_secs) {
        builder = builder.max_run_time(Duration::from_secs(seconds));
    }
    builder
        .build()
        .map_err(|e| CliError::Engine(EngineError::from(e)))
}
