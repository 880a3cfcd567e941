use holdfast_robustness::{
    query, query_async, robustly, robustly_async, Classify, ErrorKind, NotSupported,
    RobustnessConfig, SharedConfig, WaitAndRetry,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const SLACK: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0}")]
struct MarkedTestError(&'static str);

impl Classify for MarkedTestError {
    fn error_kind(&self) -> ErrorKind {
        ErrorKind::Transient
    }
}

fn budget() -> RobustnessConfig {
    RobustnessConfig::new(Duration::from_millis(200), Duration::from_millis(10))
}

#[test]
fn query_always_failing_reraises_within_window() {
    let config = budget();
    let start = Instant::now();

    let result: Result<bool, _> = query(&config, || Err(MarkedTestError("always errors")), true);
    let elapsed = start.elapsed();

    assert_eq!(result, Err(MarkedTestError("always errors")));
    assert!(elapsed >= config.timeout, "elapsed = {elapsed:?}");
    assert!(elapsed < config.timeout + SLACK, "elapsed = {elapsed:?}");
}

#[test]
fn robustly_always_failing_reraises_within_window() {
    let config = budget();
    let start = Instant::now();

    let result: Result<(), _> = robustly(&config, || Err(MarkedTestError("Fails every time")));
    let elapsed = start.elapsed();

    assert_eq!(result.unwrap_err().to_string(), "Fails every time");
    assert!(elapsed >= config.timeout, "elapsed = {elapsed:?}");
    assert!(elapsed < config.timeout + SLACK, "elapsed = {elapsed:?}");
}

#[test]
fn fatal_error_reaches_caller_after_one_attempt() {
    let config = budget();
    let mut query_tries = 0;
    let mut retry_tries = 0;
    let start = Instant::now();

    let queried: Result<String, NotSupported> = query(
        &config,
        || {
            query_tries += 1;
            Err(NotSupported::new("has_xpath"))
        },
        String::from("anything"),
    );
    let retried: Result<(), NotSupported> = robustly(&config, || {
        retry_tries += 1;
        Err(NotSupported::new("click"))
    });

    assert_eq!(queried, Err(NotSupported::new("has_xpath")));
    assert_eq!(retried, Err(NotSupported::new("click")));
    assert_eq!((query_tries, retry_tries), (1, 1));
    assert!(start.elapsed() < config.retry_interval);
}

#[test]
fn action_failing_once_is_attempted_twice() {
    let config = budget().with_timeout(Duration::from_millis(100));
    let mut tries = 0;

    let result = robustly(&config, || {
        tries += 1;
        if tries == 1 {
            return Err(MarkedTestError("Fails first time"));
        }
        Ok(())
    });

    assert_eq!(result, Ok(()));
    assert_eq!(tries, 2);
}

#[test]
fn concurrent_calls_keep_their_own_deadlines() {
    let shared = SharedConfig::new(budget());
    let short = WaitAndRetry::new(shared.clone());

    let long_engine = WaitAndRetry::new(SharedConfig::new(
        budget().with_timeout(Duration::from_millis(400)),
    ));
    let long = thread::spawn(move || {
        let start = Instant::now();
        let _ = long_engine.query(|| Ok::<_, MarkedTestError>(0), 1);
        start.elapsed()
    });

    let start = Instant::now();
    let _ = short.query(|| Ok::<_, MarkedTestError>(0), 1);
    let short_elapsed = start.elapsed();

    let long_elapsed = long.join().unwrap();
    assert!(short_elapsed < Duration::from_millis(400), "short = {short_elapsed:?}");
    assert!(long_elapsed >= Duration::from_millis(400), "long = {long_elapsed:?}");
}

#[test]
fn configuration_change_applies_to_next_call() {
    let shared = SharedConfig::new(budget());
    let engine = WaitAndRetry::new(shared.clone());

    shared.set_timeout(Duration::from_millis(30));
    let start = Instant::now();
    let _ = engine.query(|| Ok::<_, MarkedTestError>("old"), "new");
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(30));
    assert!(elapsed < Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn async_engines_suspend_between_attempts() {
    let config = budget();
    let tries = Arc::new(AtomicU32::new(0));

    let handle = {
        let tries = tries.clone();
        tokio::spawn(async move {
            robustly_async(&config, || {
                let tries = tries.clone();
                async move {
                    if tries.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(MarkedTestError("busy"))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
        })
    };

    assert_eq!(handle.await.unwrap(), Ok("done"));
    assert_eq!(tries.load(Ordering::SeqCst), 3);

    let observed = query_async(&config, || async { Ok::<_, MarkedTestError>(5) }, 5).await;
    assert_eq!(observed, Ok(5));
}
