//! Pipeline configuration from YAML.
//!
//! Every key is optional. An absent file and an empty file both mean
//! "all defaults"; command-line flags are layered on top by the caller.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where canonical artifacts land unless told otherwise.
pub const DEFAULT_ARTIFACT_DIR: &str = "_bmad-output/test-artifacts";

/// Default number of burn-in iterations.
pub const DEFAULT_BURNIN_RUNS: u32 = 100;

/// Default number of recovery drills.
pub const DEFAULT_RECOVERY_DRILLS: u32 = 5;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Raw tool outputs consumed by `normalize` and `collect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawInputs {
    /// SAST scanner output (bandit JSON or a counts summary)
    #[serde(default)]
    pub sast: Option<PathBuf>,

    /// Dependency scanner output (pip-audit JSON or a counts summary)
    #[serde(default)]
    pub deps: Option<PathBuf>,

    /// k6 `--summary-export` output
    #[serde(default)]
    pub k6: Option<PathBuf>,

    /// Performance baseline; the k6 input stands in when absent
    #[serde(default)]
    pub perf: Option<PathBuf>,

    #[serde(default)]
    pub burnin: Option<PathBuf>,

    #[serde(default)]
    pub recovery: Option<PathBuf>,
}

/// Knobs for the raw-evidence collectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectSettings {
    #[serde(default = "default_burnin_runs")]
    pub burnin_runs: u32,

    #[serde(default = "default_recovery_drills")]
    pub recovery_drills: u32,

    /// Command run as the burn-in probe. Empty means the built-in parse probe.
    #[serde(default)]
    pub burnin_command: Vec<String>,
}

impl Default for CollectSettings {
    fn default() -> Self {
        Self {
            burnin_runs: DEFAULT_BURNIN_RUNS,
            recovery_drills: DEFAULT_RECOVERY_DRILLS,
            burnin_command: Vec::new(),
        }
    }
}

fn default_burnin_runs() -> u32 {
    DEFAULT_BURNIN_RUNS
}

fn default_recovery_drills() -> u32 {
    DEFAULT_RECOVERY_DRILLS
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACT_DIR)
}

/// A pipeline configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding canonical artifacts
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Directory for raw collector output; `<artifact_dir>/raw` when unset
    #[serde(default)]
    pub raw_dir: Option<PathBuf>,

    #[serde(default)]
    pub inputs: RawInputs,

    #[serde(default)]
    pub collect: CollectSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
            raw_dir: None,
            inputs: RawInputs::default(),
            collect: CollectSettings::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load the file when one was given, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading pipeline config");
                Self::from_yaml_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Effective raw directory.
    pub fn raw_dir(&self) -> PathBuf {
        self.raw_dir
            .clone()
            .unwrap_or_else(|| self.artifact_dir.join("raw"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.artifact_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "artifact_dir must not be empty".to_string(),
            ));
        }
        if self.collect.burnin_command.first().is_some_and(|c| c.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "collect.burnin_command must start with a program".to_string(),
            ));
        }
        Ok(())
    }
}
