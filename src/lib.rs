//! Holdfast library
//!
//! Exposes the CLI building blocks for integration testing

pub mod cli;
pub mod probe;
pub mod settings;

pub use probe::{CommandError, CommandOutput, CommandSpec};
pub use settings::AppSettings;
