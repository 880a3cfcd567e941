use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Serialized report for machine-readable formats, `None` for human output
    pub fn render<T: Serialize>(&self, value: &T) -> Result<Option<String>> {
        let rendered = match self {
            OutputFormat::Human => return Ok(None),
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };
        Ok(Some(rendered))
    }
}
