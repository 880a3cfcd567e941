pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod output;
pub mod retry;
pub mod runtime;
pub mod wait;

pub use config::{cmd_config, ConfigArgs};
pub use retry::{cmd_retry, RetryArgs};
pub use wait::{cmd_wait, WaitArgs};
