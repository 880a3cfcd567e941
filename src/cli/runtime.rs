use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::AppSettings;

pub fn init_logging(level: &str, debug: bool, json: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    // stdout carries command results; logs go to stderr
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

pub struct LoadedConfig {
    pub settings: AppSettings,
    pub path: Option<PathBuf>,
}

pub fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file {} does not exist", path.display());
            }
            Some(path.clone())
        }
        None => default_config_path(),
    };

    let settings = AppSettings::load(path.as_deref()).context("Failed to load configuration")?;
    match &path {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("No configuration file found; using defaults"),
    }

    Ok(LoadedConfig { settings, path })
}

// Priority: ./config/holdfast.yaml > ~/.config/holdfast/config.yaml
fn default_config_path() -> Option<PathBuf> {
    let local = Path::new("config/holdfast.yaml");
    if local.exists() {
        return Some(local.to_path_buf());
    }

    let mut path = dirs::config_dir()?;
    path.push("holdfast");
    path.push("config.yaml");
    path.exists().then_some(path)
}
