use clap::Subcommand;

use super::config::ConfigArgs;
use super::retry::RetryArgs;
use super::wait::WaitArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Poll a command until it prints the expected output
    Wait(WaitArgs),

    /// Re-run a command until it exits successfully
    Retry(RetryArgs),

    /// Inspect the effective configuration
    Config(ConfigArgs),
}
