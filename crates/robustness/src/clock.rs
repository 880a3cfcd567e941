//! Time sources for the blocking engines

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Current time plus a blocking delay
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);
}

/// Monotonic wall clock backed by the OS scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Virtual clock whose sleeps return immediately.
///
/// Clones share the same timeline, so an operation under test can call
/// [`advance`](ManualClock::advance) to simulate its own latency while the
/// engine holds another clone.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug, Default)]
struct ManualState {
    offset: Duration,
    sleeps: usize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(ManualState::default())),
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.state.lock().offset += duration;
    }

    /// Virtual time since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.state.lock().offset
    }

    /// Number of sleeps requested so far
    pub fn sleeps(&self) -> usize {
        self.state.lock().sleeps
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.state.lock().offset
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.offset += duration;
        state.sleeps += 1;
    }
}

/// Point in time after which a retry loop stops.
///
/// A budget too large to represent never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn after(start: Instant, budget: Duration) -> Self {
        Self(start.checked_add(budget))
    }

    pub fn has_passed(&self, now: Instant) -> bool {
        self.0.is_some_and(|deadline| now >= deadline)
    }
}

/// Current instant on the tokio timer, which honours a paused test clock
pub(crate) fn tokio_now() -> Instant {
    tokio::time::Instant::now().into_std()
}

pub(crate) fn elapsed_ms(now: Instant, started: Instant) -> u64 {
    now.saturating_duration_since(started).as_millis() as u64
}
