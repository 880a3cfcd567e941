use anyhow::Result;
use clap::{Args, Subcommand};
use std::process::ExitCode;

use crate::cli::context::CliContext;
use crate::cli::output::OutputFormat;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration after all overrides
    Show,

    /// Print the configuration file in use
    Path,
}

pub fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<ExitCode> {
    match args.action {
        ConfigAction::Show => {
            let rendered = match ctx.output() {
                OutputFormat::Json => serde_json::to_string_pretty(ctx.settings())?,
                OutputFormat::Human | OutputFormat::Yaml => serde_yaml::to_string(ctx.settings())?,
            };
            println!("{}", rendered.trim_end());
        }
        ConfigAction::Path => match ctx.config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("(defaults)"),
        },
    }
    Ok(ExitCode::SUCCESS)
}
