use std::path::{Path, PathBuf};

use holdfast_robustness::RobustnessConfig;

use super::output::OutputFormat;
use crate::settings::AppSettings;

pub struct CliContext {
    settings: AppSettings,
    config_path: Option<PathBuf>,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(settings: AppSettings, config_path: Option<PathBuf>, output: OutputFormat) -> Self {
        Self {
            settings,
            config_path,
            output,
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn robustness(&self) -> RobustnessConfig {
        self.settings.robustness
    }

    /// File the settings were read from, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }
}
