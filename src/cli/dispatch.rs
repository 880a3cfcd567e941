use std::process::ExitCode;

use super::config::cmd_config;
use super::env::CliArgs;
use super::retry::cmd_retry;
use super::wait::cmd_wait;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<ExitCode> {
    match cli.command.clone() {
        Commands::Wait(args) => cmd_wait(args, ctx).await,
        Commands::Retry(args) => cmd_retry(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx),
    }
}
