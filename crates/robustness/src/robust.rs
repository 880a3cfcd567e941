//! Single seam over both retry strategies

use crate::clock::{Clock, SystemClock};
use crate::config::SharedConfig;
use crate::errors::Classify;
use crate::query::WaitAndRetry;
use crate::retry::RetryUntilTimeout;

/// What collaborators need from the robust-execution core
pub trait RobustWrapper {
    /// Retry `op` until it stops failing; re-raise the last error on timeout
    fn robustly<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify;

    /// Poll `op` until it yields `expected`; return the last value on timeout
    fn query<T, E, F>(&self, op: F, expected: T) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        T: PartialEq,
        E: Classify;
}

/// Both engines driven by one configuration handle and one clock
#[derive(Debug, Clone)]
pub struct Robustness<C = SystemClock> {
    retry: RetryUntilTimeout<C>,
    wait: WaitAndRetry<C>,
}

impl Robustness {
    pub fn new(config: impl Into<SharedConfig>) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock + Clone> Robustness<C> {
    pub fn with_clock(config: impl Into<SharedConfig>, clock: C) -> Self {
        let config = config.into();
        Self {
            retry: RetryUntilTimeout::with_clock(config.clone(), clock.clone()),
            wait: WaitAndRetry::with_clock(config, clock),
        }
    }

    pub fn config(&self) -> &SharedConfig {
        self.retry.config()
    }

    pub fn retry_engine(&self) -> &RetryUntilTimeout<C> {
        &self.retry
    }

    pub fn query_engine(&self) -> &WaitAndRetry<C> {
        &self.wait
    }
}

impl<C: Clock + Clone> RobustWrapper for Robustness<C> {
    fn robustly<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: Classify,
    {
        self.retry.robustly(op)
    }

    fn query<T, E, F>(&self, op: F, expected: T) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        T: PartialEq,
        E: Classify,
    {
        self.wait.query(op, expected)
    }
}
