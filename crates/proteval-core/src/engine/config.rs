use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default wall-clock bound shared by all external tools.
pub const DEFAULT_MAX_RUN_TIME: Duration = Duration::from_secs(600);

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter {0} must not be empty")]
    EmptyParameter(&'static str),
}

/// Immutable configuration for the metrics pipeline.
///
/// Every external-tool path must be explicitly configured before any work
/// starts: a silently-skipped tool would produce `None`-filled results
/// indistinguishable from a genuine runtime failure.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// EvoEF2 binary.
    pub evoef2_binary: PathBuf,
    /// Directory containing the DFIRE2 `calene` binary and `dfire_pair.lib`.
    pub dfire2_dir: PathBuf,
    /// Rosetta `score_jd2` binary.
    pub rosetta_binary: PathBuf,
    /// Aggrescan3D driver script.
    pub aggrescan3d_script: PathBuf,
    /// Interpreter used to run the Aggrescan3D script.
    pub python_binary: PathBuf,
    /// Maximum wall-clock run time shared by all four external tools.
    pub max_run_time: Duration,
}

#[derive(Default)]
pub struct MetricsConfigBuilder {
    evoef2_binary: Option<PathBuf>,
    dfire2_dir: Option<PathBuf>,
    rosetta_binary: Option<PathBuf>,
    aggrescan3d_script: Option<PathBuf>,
    python_binary: Option<PathBuf>,
    max_run_time: Option<Duration>,
}

impl MetricsConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evoef2_binary(mut self, path: PathBuf) -> Self {
        self.evoef2_binary = Some(path);
        self
    }
    pub fn dfire2_dir(mut self, path: PathBuf) -> Self {
        self.dfire2_dir = Some(path);
        self
    }
    pub fn rosetta_binary(mut self, path: PathBuf) -> Self {
        self.rosetta_binary = Some(path);
        self
    }
    pub fn aggrescan3d_script(mut self, path: PathBuf) -> Self {
        self.aggrescan3d_script = Some(path);
        self
    }
    pub fn python_binary(mut self, path: PathBuf) -> Self {
        self.python_binary = Some(path);
        self
    }
    pub fn max_run_time(mut self, limit: Duration) -> Self {
        self.max_run_time = Some(limit);
        self
    }

    pub fn build(self) -> Result<MetricsConfig, ConfigError> {
        let config = MetricsConfig {
            evoef2_binary: self
                .evoef2_binary
                .ok_or(ConfigError::MissingParameter("evoef2_binary"))?,
            dfire2_dir: self
                .dfire2_dir
                .ok_or(ConfigError::MissingParameter("dfire2_dir"))?,
            rosetta_binary: self
                .rosetta_binary
                .ok_or(ConfigError::MissingParameter("rosetta_binary"))?,
            aggrescan3d_script: self
                .aggrescan3d_script
                .ok_or(ConfigError::MissingParameter("aggrescan3d_script"))?,
            python_binary: self
                .python_binary
                .unwrap_or_else(|| PathBuf::from("python2")),
            max_run_time: self.max_run_time.unwrap_or(DEFAULT_MAX_RUN_TIME),
        };

        for (name, path) in [
            ("evoef2_binary", &config.evoef2_binary),
            ("dfire2_dir", &config.dfire2_dir),
            ("rosetta_binary", &config.rosetta_binary),
            ("aggrescan3d_script", &config.aggrescan3d_script),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyParameter(name));
            }
        }
        Ok(config)
    }
}
