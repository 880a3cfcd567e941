//! Wait-and-retry query engine
//!
//! Polls an observation until it equals an expected value. Running out of
//! time is not an error here: the most recently observed value is handed
//! back and the caller decides what a mismatch means.

use crate::clock::{elapsed_ms, tokio_now, Clock, Deadline, SystemClock};
use crate::config::{RobustnessConfig, SharedConfig};
use crate::errors::Classify;
use std::future::Future;
use tracing::{debug, trace};

/// Poll-for-expected-value strategy
#[derive(Debug, Clone)]
pub struct WaitAndRetry<C = SystemClock> {
    config: SharedConfig,
    clock: C,
}

impl WaitAndRetry {
    pub fn new(config: impl Into<SharedConfig>) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> WaitAndRetry<C> {
    pub fn with_clock(config: impl Into<SharedConfig>, clock: C) -> Self {
        Self {
            config: config.into(),
            clock,
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Evaluate `op` until it returns `expected` or the timeout elapses.
    ///
    /// Blocks the calling thread between attempts.
    pub fn query<T, E, F>(&self, op: F, expected: T) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        T: PartialEq,
        E: Classify,
    {
        poll_until(&self.clock, &self.config.snapshot(), op, expected)
    }

    /// Same contract as [`query`](Self::query), suspending on the tokio
    /// timer instead of blocking. The engine's clock is not consulted.
    pub async fn query_async<T, E, F, Fut>(&self, op: F, expected: T) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        T: PartialEq,
        E: Classify,
    {
        poll_until_async(&self.config.snapshot(), op, expected).await
    }
}

pub(crate) fn poll_until<C, T, E, F>(
    clock: &C,
    config: &RobustnessConfig,
    mut op: F,
    expected: T,
) -> Result<T, E>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<T, E>,
    T: PartialEq,
    E: Classify,
{
    let started = clock.now();
    let deadline = Deadline::after(started, config.timeout);
    let mut last_value = None;
    let mut attempt: u64 = 0;

    loop {
        attempt = attempt.saturating_add(1);
        match op() {
            Ok(value) => {
                if value == expected {
                    trace!(attempt, "query matched expected value");
                    return Ok(value);
                }
                if deadline.has_passed(clock.now()) {
                    debug!(
                        attempt,
                        elapsed_ms = elapsed_ms(clock.now(), started),
                        "query timed out; returning last observed value"
                    );
                    return Ok(value);
                }
                last_value = Some(value);
            }
            Err(err) => {
                if err.error_kind().is_fatal() {
                    return Err(err);
                }
                if deadline.has_passed(clock.now()) {
                    debug!(
                        attempt,
                        elapsed_ms = elapsed_ms(clock.now(), started),
                        observed = last_value.is_some(),
                        "query timed out after a failed attempt"
                    );
                    return match last_value {
                        Some(value) => Ok(value),
                        None => Err(err),
                    };
                }
                trace!(attempt, "query attempt failed; retrying");
            }
        }
        clock.sleep(config.retry_interval);
    }
}

pub(crate) async fn poll_until_async<T, E, F, Fut>(
    config: &RobustnessConfig,
    mut op: F,
    expected: T,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    T: PartialEq,
    E: Classify,
{
    let started = tokio_now();
    let deadline = Deadline::after(started, config.timeout);
    let mut last_value = None;
    let mut attempt: u64 = 0;

    loop {
        attempt = attempt.saturating_add(1);
        match op().await {
            Ok(value) => {
                if value == expected {
                    trace!(attempt, "query matched expected value");
                    return Ok(value);
                }
                if deadline.has_passed(tokio_now()) {
                    debug!(
                        attempt,
                        elapsed_ms = elapsed_ms(tokio_now(), started),
                        "query timed out; returning last observed value"
                    );
                    return Ok(value);
                }
                last_value = Some(value);
            }
            Err(err) => {
                if err.error_kind().is_fatal() {
                    return Err(err);
                }
                if deadline.has_passed(tokio_now()) {
                    debug!(
                        attempt,
                        elapsed_ms = elapsed_ms(tokio_now(), started),
                        observed = last_value.is_some(),
                        "query timed out after a failed attempt"
                    );
                    return match last_value {
                        Some(value) => Ok(value),
                        None => Err(err),
                    };
                }
                trace!(attempt, "query attempt failed; retrying");
            }
        }
        tokio::time::sleep(config.retry_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::errors::NotSupported;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{Duration, Instant};
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq)]
    #[error("{0}")]
    struct ExplicitlyThrown(&'static str);

    impl Classify for ExplicitlyThrown {
        fn error_kind(&self) -> crate::ErrorKind {
            crate::ErrorKind::Transient
        }
    }

    fn test_config() -> RobustnessConfig {
        RobustnessConfig::new(Duration::from_millis(200), Duration::from_millis(10))
    }

    fn manual_engine() -> (WaitAndRetry<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (WaitAndRetry::with_clock(test_config(), clock.clone()), clock)
    }

    #[test]
    fn test_expected_result_returns_immediately() {
        let (engine, clock) = manual_engine();

        let found = engine.query(|| Ok::<_, ExplicitlyThrown>("ready"), "ready");

        assert_eq!(found, Ok("ready"));
        assert_eq!(clock.sleeps(), 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_unexpected_result_returned_after_timeout() {
        let (engine, clock) = manual_engine();
        let mut tries = 0;

        let found = engine.query(
            || {
                tries += 1;
                Ok::<_, ExplicitlyThrown>("loading")
            },
            "ready",
        );

        assert_eq!(found, Ok("loading"));
        // attempts at 0ms, 10ms, ... 200ms
        assert_eq!(tries, 21);
        assert_eq!(clock.elapsed(), Duration::from_millis(200));
    }

    #[test]
    fn test_always_failing_rethrows_after_timeout() {
        let (engine, clock) = manual_engine();
        let mut tries = 0;

        let result: Result<bool, _> = engine.query(
            || {
                tries += 1;
                Err(ExplicitlyThrown("This query always errors"))
            },
            true,
        );

        assert_eq!(result, Err(ExplicitlyThrown("This query always errors")));
        assert_eq!(tries, 21);
        assert!(clock.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_retries_through_errors_then_returns_expected() {
        let (engine, _clock) = manual_engine();
        let mut tries = 0;

        let found = engine.query(
            || {
                tries += 1;
                if tries < 3 {
                    return Err(ExplicitlyThrown("This query always errors"));
                }
                Ok(42)
            },
            42,
        );

        assert_eq!(found, Ok(42));
        assert_eq!(tries, 3);
    }

    #[test]
    fn test_errors_then_unexpected_value_returns_value_after_timeout() {
        let clock = ManualClock::new();
        let engine = WaitAndRetry::with_clock(
            test_config().with_timeout(Duration::from_millis(250)),
            clock.clone(),
        );
        let mut tries = 0;

        let found = engine.query(
            || {
                tries += 1;
                if tries < 3 {
                    return Err(ExplicitlyThrown("This query always errors"));
                }
                Ok("unexpected")
            },
            "expected",
        );

        assert_eq!(found, Ok("unexpected"));
        assert!((4..=27).contains(&tries), "tries = {tries}");
    }

    #[test]
    fn test_value_survives_late_transient_error() {
        let (engine, _clock) = manual_engine();
        let mut tries = 0;

        // the final attempt fails, but a value was observed earlier
        let found = engine.query(
            || {
                tries += 1;
                if tries == 1 {
                    Ok("stale")
                } else {
                    Err(ExplicitlyThrown("flaky"))
                }
            },
            "fresh",
        );

        assert_eq!(found, Ok("stale"));
    }

    #[test]
    fn test_not_supported_is_not_retried() {
        let (engine, clock) = manual_engine();
        let mut tries = 0;

        let result: Result<bool, NotSupported> = engine.query(
            || {
                tries += 1;
                Err(NotSupported::new("This query always errors"))
            },
            true,
        );

        assert_eq!(result, Err(NotSupported::new("This query always errors")));
        assert_eq!(tries, 1);
        assert_eq!(clock.sleeps(), 0);
    }

    #[test]
    fn test_zero_timeout_makes_single_attempt() {
        let clock = ManualClock::new();
        let engine = WaitAndRetry::with_clock(
            RobustnessConfig::new(Duration::ZERO, Duration::from_millis(10)),
            clock.clone(),
        );
        let mut tries = 0;

        let found = engine.query(
            || {
                tries += 1;
                Ok::<_, ExplicitlyThrown>(false)
            },
            true,
        );

        assert_eq!(found, Ok(false));
        assert_eq!(tries, 1);
    }

    #[test]
    fn test_unbounded_budget_with_zero_interval_keeps_polling() {
        let engine = WaitAndRetry::with_clock(
            RobustnessConfig::new(Duration::MAX, Duration::ZERO),
            ManualClock::new(),
        );
        let mut tries: u64 = 0;

        let found = engine.query(
            || {
                tries += 1;
                Ok::<_, ExplicitlyThrown>(tries >= 200_000)
            },
            true,
        );

        assert_eq!(found, Ok(true));
        assert_eq!(tries, 200_000);
    }

    #[test]
    fn test_slow_operation_reduces_attempts() {
        let (engine, clock) = manual_engine();
        let op_clock = clock.clone();
        let mut tries = 0;

        let _ = engine.query(
            || {
                tries += 1;
                op_clock.advance(Duration::from_millis(30));
                Ok::<_, ExplicitlyThrown>(0)
            },
            1,
        );

        // each round costs 30ms of work plus a 10ms pause
        assert_eq!(tries, 6);
        assert_eq!(clock.elapsed(), Duration::from_millis(230));
    }

    #[test]
    fn test_configuration_is_read_per_call() {
        let (engine, _clock) = manual_engine();
        let count = || {
            let mut tries = 0;
            let _ = engine.query(
                || {
                    tries += 1;
                    Ok::<_, ExplicitlyThrown>(false)
                },
                true,
            );
            tries
        };

        assert_eq!(count(), 21);
        engine.config().set_timeout(Duration::from_millis(50));
        assert_eq!(count(), 6);
    }

    #[test]
    fn test_real_clock_timeout_window() {
        let engine = WaitAndRetry::new(test_config());
        let expected_timeout = Duration::from_millis(200);

        let start = Instant::now();
        let found = engine.query(|| Ok::<_, ExplicitlyThrown>("unexpected"), "expected");
        let elapsed = start.elapsed();

        assert_eq!(found, Ok("unexpected"));
        assert!(elapsed >= expected_timeout, "elapsed = {elapsed:?}");
        assert!(
            elapsed < expected_timeout + Duration::from_millis(100),
            "elapsed = {elapsed:?}"
        );
    }

    #[test]
    fn test_real_clock_fast_success() {
        let engine = WaitAndRetry::new(test_config());

        let start = Instant::now();
        let found = engine.query(|| Ok::<_, ExplicitlyThrown>(true), true);

        assert_eq!(found, Ok(true));
        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_query_polls_until_match() {
        let engine = WaitAndRetry::new(test_config());
        let tries = AtomicU32::new(0);
        let counter = &tries;

        let found = engine
            .query_async(
                move || async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < 5 {
                        Err(ExplicitlyThrown("not rendered yet"))
                    } else {
                        Ok(n >= 7)
                    }
                },
                true,
            )
            .await;

        assert_eq!(found, Ok(true));
        assert_eq!(tries.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_async_query_times_out_with_last_value() {
        let engine = WaitAndRetry::new(test_config());
        let tries = AtomicU32::new(0);
        let counter = &tries;
        let start = tokio::time::Instant::now();

        let found = engine
            .query_async(
                move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ExplicitlyThrown>("loading")
                },
                "done",
            )
            .await;

        assert_eq!(found, Ok("loading"));
        assert!(start.elapsed() >= Duration::from_millis(200));
        let tries = tries.load(Ordering::SeqCst);
        assert!((15..=21).contains(&tries), "tries = {tries}");
    }
}
