//! Retry-until-success engine

use crate::clock::{elapsed_ms, tokio_now, Clock, Deadline, SystemClock};
use crate::config::{RobustnessConfig, SharedConfig};
use crate::errors::Classify;
use std::future::Future;
use tracing::{debug, trace};

/// Retries an operation until it stops failing or the timeout elapses.
///
/// On exhaustion the last transient error is returned exactly as the
/// operation produced it.
#[derive(Debug, Clone)]
pub struct RetryUntilTimeout<C = SystemClock> {
    config: SharedConfig,
    clock: C,
}

impl RetryUntilTimeout {
    pub fn new(config: impl Into<SharedConfig>) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RetryUntilTimeout<C> {
    pub fn with_clock(config: impl Into<SharedConfig>, clock: C) -> Self {
        Self {
            config: config.into(),
            clock,
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Run `op` until it succeeds. Actions use `T = ()`.
    pub fn robustly<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify,
    {
        retry_until(&self.clock, &self.config.snapshot(), op)
    }

    /// Cooperative form of [`robustly`](Self::robustly) on the tokio timer
    pub async fn robustly_async<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify,
    {
        retry_until_async(&self.config.snapshot(), op).await
    }
}

pub(crate) fn retry_until<C, T, E, F>(clock: &C, config: &RobustnessConfig, mut op: F) -> Result<T, E>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<T, E>,
    E: Classify,
{
    let started = clock.now();
    let deadline = Deadline::after(started, config.timeout);
    let mut attempt: u64 = 0;

    loop {
        attempt = attempt.saturating_add(1);
        let err = match op() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if err.error_kind().is_fatal() {
            return Err(err);
        }

        let now = clock.now();
        if deadline.has_passed(now) {
            debug!(
                attempt,
                elapsed_ms = elapsed_ms(now, started),
                "retry budget exhausted"
            );
            return Err(err);
        }

        trace!(attempt, "attempt failed; retrying");
        clock.sleep(config.retry_interval);
    }
}

pub(crate) async fn retry_until_async<T, E, F, Fut>(config: &RobustnessConfig, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Classify,
{
    let started = tokio_now();
    let deadline = Deadline::after(started, config.timeout);
    let mut attempt: u64 = 0;

    loop {
        attempt = attempt.saturating_add(1);
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if err.error_kind().is_fatal() {
            return Err(err);
        }

        let now = tokio_now();
        if deadline.has_passed(now) {
            debug!(
                attempt,
                elapsed_ms = elapsed_ms(now, started),
                "retry budget exhausted"
            );
            return Err(err);
        }

        trace!(attempt, "attempt failed; retrying");
        tokio::time::sleep(config.retry_interval).await;
    }
}
