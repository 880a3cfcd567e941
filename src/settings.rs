//! Application settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional YAML
//! file, then `HOLDFAST_*` environment variables
//! (`HOLDFAST_ROBUSTNESS__TIMEOUT=5s`).

use ::config::{Config, ConfigError, Environment, File, FileFormat};
use holdfast_robustness::RobustnessConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_PREFIX: &str = "HOLDFAST";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub robustness: RobustnessConfig,
}

impl AppSettings {
    /// Load settings from `file` (if any) and the process environment
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(file, environment())
    }

    pub fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }
        builder.add_source(env).build()?.try_deserialize()
    }

    /// Command-line flags win over every other layer
    pub fn apply_overrides(&mut self, timeout: Option<Duration>, retry_interval: Option<Duration>) {
        if let Some(timeout) = timeout {
            self.robustness.timeout = timeout;
        }
        if let Some(retry_interval) = retry_interval {
            self.robustness.retry_interval = retry_interval;
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
