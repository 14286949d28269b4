//! Run configuration from `ci-runner.config.yaml`

use crate::core::step::Step;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File name searched for by [`ConfigLocator`]
pub const CONFIG_FILE: &str = "ci-runner.config.yaml";

/// Vendor root used when the config does not set one
pub const DEFAULT_VENDOR_ROOT: &str = "./";

/// Error types for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found for path {}", .start.display())]
    NotFound { start: PathBuf },

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("run flag '{key}' must be true or false")]
    InvalidFlag { key: String },
}

/// What to do after a step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the run at the first failed step
    #[default]
    Abort,
    /// Keep running the remaining steps, still failing the run at the end
    Continue,
}

/// Raw document layout as written in YAML
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ConfigFile {
    #[serde(default)]
    vendor_root: Option<String>,

    /// Step flags, keyed by step name or alias
    #[serde(default)]
    run: Option<HashMap<String, Value>>,

    #[serde(default)]
    on_failure: FailurePolicy,

    /// Everything else; holds the flags of the older flat layout
    #[serde(flatten)]
    rest: HashMap<String, Value>,
}

/// How a step is treated by a given configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Mutating step during a no-mods run
    Ignore,
    /// Disabled by config
    Bypass,
    Run,
}

/// Resolved, read-only configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    vendor_root: String,
    enabled: HashMap<String, bool>,
    no_mods: bool,
    on_failure: FailurePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            vendor_root: DEFAULT_VENDOR_ROOT.to_string(),
            enabled: HashMap::new(),
            no_mods: false,
            on_failure: FailurePolicy::Abort,
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string. An empty document enables nothing.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Ok(Self::default());
        }

        let file: ConfigFile = serde_yaml::from_value(value)?;
        Self::from_config_file(file)
    }

    fn from_config_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let flags = match file.run {
            Some(run) => run,
            None => {
                let legacy: HashMap<String, Value> = file
                    .rest
                    .into_iter()
                    .filter(|(_, value)| value.is_bool())
                    .collect();
                if !legacy.is_empty() {
                    warn!("Reading step flags from top-level keys; move them under 'run'");
                }
                legacy
            }
        };

        let mut enabled = HashMap::with_capacity(flags.len());
        for (key, value) in flags {
            let on = match value {
                Value::Bool(on) => on,
                Value::Null => false,
                _ => return Err(ConfigError::InvalidFlag { key }),
            };
            enabled.insert(key, on);
        }

        Ok(Self {
            vendor_root: file
                .vendor_root
                .unwrap_or_else(|| DEFAULT_VENDOR_ROOT.to_string()),
            enabled,
            no_mods: false,
            on_failure: file.on_failure,
        })
    }

    /// Set no-mods mode, which comes from the command line rather than the file
    pub fn with_no_mods(mut self, no_mods: bool) -> Self {
        self.no_mods = no_mods;
        self
    }

    pub fn vendor_root(&self) -> &str {
        &self.vendor_root
    }

    pub fn no_mods(&self) -> bool {
        self.no_mods
    }

    pub fn on_failure(&self) -> FailurePolicy {
        self.on_failure
    }

    /// Configured flag keys, in no particular order
    pub fn flag_keys(&self) -> impl Iterator<Item = &str> {
        self.enabled.keys().map(String::as_str)
    }

    /// Whether the step's flag is on. The primary name wins over aliases.
    pub fn is_enabled(&self, step: &Step) -> bool {
        step.keys()
            .find_map(|key| self.enabled.get(key).copied())
            .unwrap_or(false)
    }

    /// Decide how a step is handled. No-mods takes priority over the flag.
    pub fn gate(&self, step: &Step) -> Gate {
        if step.mutating && self.no_mods {
            Gate::Ignore
        } else if !self.is_enabled(step) {
            Gate::Bypass
        } else {
            Gate::Run
        }
    }
}

/// Finds the config file by walking up from a starting directory
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    file_name: String,
}

impl Default for ConfigLocator {
    fn default() -> Self {
        Self::new(CONFIG_FILE)
    }
}

impl ConfigLocator {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Return the first `<dir>/<file_name>` from `start` up to the filesystem root
    pub fn locate(&self, start: &Path) -> Result<PathBuf, ConfigError> {
        let not_found = || ConfigError::NotFound {
            start: start.to_path_buf(),
        };

        let start_dir = start.canonicalize().map_err(|_| not_found())?;
        let start_dir = if start_dir.is_dir() {
            start_dir.as_path()
        } else {
            start_dir.parent().ok_or_else(not_found)?
        };

        for dir in start_dir.ancestors() {
            let candidate = dir.join(&self.file_name);
            if candidate.is_file() {
                debug!("Found config at {}", candidate.display());
                return Ok(candidate);
            }
        }

        Err(not_found())
    }

    /// Locate and parse the config
    pub fn load(&self, start: &Path) -> Result<RunConfig, ConfigError> {
        let path = self.locate(start)?;
        RunConfig::from_file(path)
    }
}
