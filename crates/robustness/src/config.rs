//! Robustness configuration: the time budget and the pause between attempts

use crate::errors::ConfigError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Timing parameters read by both engines at the start of every call.
///
/// Durations are written in humantime notation (`"250ms"`, `"1s"`) when
/// (de)serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RobustnessConfig {
    /// Total wall-clock budget of one retry loop
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Delay inserted after each unsuccessful attempt
    #[serde(with = "humantime_duration")]
    pub retry_interval: Duration,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl RobustnessConfig {
    pub fn new(timeout: Duration, retry_interval: Duration) -> Self {
        Self {
            timeout,
            retry_interval,
        }
    }

    /// Parse both durations from humantime strings
    pub fn parse(timeout: &str, retry_interval: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            timeout: parse_field("timeout", timeout)?,
            retry_interval: parse_field("retry_interval", retry_interval)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        field,
        value: value.to_string(),
        source,
    })
}

/// Host-settable configuration shared by every engine built from it.
///
/// Engines take a [`snapshot`](SharedConfig::snapshot) when a call starts, so
/// a change made here affects the next call and never one already in flight.
/// Writers are not coordinated with running calls beyond that.
#[derive(Clone, Debug, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<RobustnessConfig>>,
}

impl SharedConfig {
    pub fn new(config: RobustnessConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> RobustnessConfig {
        *self.inner.read()
    }

    pub fn set_timeout(&self, timeout: Duration) {
        self.inner.write().timeout = timeout;
    }

    pub fn set_retry_interval(&self, retry_interval: Duration) {
        self.inner.write().retry_interval = retry_interval;
    }

    /// Swap in a whole configuration, returning the previous one
    pub fn replace(&self, config: RobustnessConfig) -> RobustnessConfig {
        std::mem::replace(&mut *self.inner.write(), config)
    }
}

impl From<RobustnessConfig> for SharedConfig {
    fn from(config: RobustnessConfig) -> Self {
        Self::new(config)
    }
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(serde::de::Error::custom)
    }
}
