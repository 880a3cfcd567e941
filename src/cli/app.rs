use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use super::context::CliContext;
use super::dispatch::dispatch;
use super::env::CliArgs;
use super::runtime::{init_logging, load_config, LoadedConfig};

/// Exit status for errors outside the command's own outcome
pub const EXIT_ERROR: u8 = 2;

pub async fn run() -> ExitCode {
    let cli = CliArgs::parse();

    if let Err(err) = init_logging(&cli.log_level, cli.debug, cli.log_json) {
        eprintln!("error: {err:#}");
        return ExitCode::from(EXIT_ERROR);
    }

    info!("Starting holdfast v{}", env!("CARGO_PKG_VERSION"));

    match execute(&cli).await {
        Ok(code) => {
            info!("Command completed");
            code
        }
        Err(err) => {
            error!("Command failed: {:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn execute(cli: &CliArgs) -> Result<ExitCode> {
    let LoadedConfig { mut settings, path } = load_config(cli.config.as_ref())?;
    settings.apply_overrides(cli.timeout, cli.retry_interval);

    let ctx = CliContext::new(settings, path, cli.output);
    dispatch(cli, &ctx).await
}
