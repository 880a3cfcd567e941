//! Robust execution core
//!
//! Two retry strategies that make an operation against an asynchronously
//! changing system behave as if it were synchronous, within a time budget:
//! - [`WaitAndRetry`]: poll until an observed value equals an expected one,
//!   returning the last observation on timeout
//! - [`RetryUntilTimeout`]: retry until the operation stops failing,
//!   re-raising the last failure on timeout
//!
//! Errors are split by [`Classify`] into fatal ones, which propagate on the
//! first attempt, and transient ones, which are retried.

pub mod clock;
pub mod config;
pub mod errors;
pub mod query;
pub mod retry;
mod robust;

pub use clock::{Clock, Deadline, ManualClock, SystemClock};
pub use config::{RobustnessConfig, SharedConfig};
pub use errors::{classify, Classify, ConfigError, ErrorKind, NotSupported};
pub use query::WaitAndRetry;
pub use retry::RetryUntilTimeout;
pub use robust::{RobustWrapper, Robustness};

use std::future::Future;

/// Poll `op` against `expected` with an explicit configuration snapshot
pub fn query<T, E, F>(config: &RobustnessConfig, op: F, expected: T) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    T: PartialEq,
    E: Classify,
{
    query::poll_until(&SystemClock, config, op, expected)
}

/// Retry `op` until success with an explicit configuration snapshot
pub fn robustly<T, E, F>(config: &RobustnessConfig, op: F) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: Classify,
{
    retry::retry_until(&SystemClock, config, op)
}

pub async fn query_async<T, E, F, Fut>(config: &RobustnessConfig, op: F, expected: T) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: PartialEq,
    E: Classify,
{
    query::poll_until_async(config, op, expected).await
}

pub async fn robustly_async<T, E, F, Fut>(config: &RobustnessConfig, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify,
{
    retry::retry_until_async(config, op).await
}
