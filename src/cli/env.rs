use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::commands::Commands;
use super::output::OutputFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Enable debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Total time budget, e.g. "5s" (overrides configuration)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,

    /// Pause between attempts, e.g. "250ms" (overrides configuration)
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    pub retry_interval: Option<Duration>,

    #[command(subcommand)]
    pub command: Commands,
}
