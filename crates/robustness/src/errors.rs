//! Error classification for the retry engines

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// How a retry engine treats an error raised by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The capability is structurally unavailable; propagated on first sight
    Fatal,

    /// Any other failure; retried while the time budget lasts
    Transient,
}

impl ErrorKind {
    pub fn is_fatal(self) -> bool {
        matches!(self, ErrorKind::Fatal)
    }
}

/// Total classification of an error into an [`ErrorKind`].
///
/// The engines call this once per failed attempt. Implementations must not
/// panic and must answer from the error's structured kind alone.
pub trait Classify {
    fn error_kind(&self) -> ErrorKind;
}

/// Classify an error without naming the trait.
pub fn classify<E: Classify + ?Sized>(error: &E) -> ErrorKind {
    error.error_kind()
}

/// The requested capability is not supported by the current target
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Not supported: {0}")]
pub struct NotSupported(pub String);

impl NotSupported {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Classify for NotSupported {
    fn error_kind(&self) -> ErrorKind {
        ErrorKind::Fatal
    }
}

impl Classify for io::Error {
    fn error_kind(&self) -> ErrorKind {
        match self.kind() {
            io::ErrorKind::Unsupported => ErrorKind::Fatal,
            _ => ErrorKind::Transient,
        }
    }
}

impl Classify for anyhow::Error {
    fn error_kind(&self) -> ErrorKind {
        let unsupported = self.chain().any(|cause| {
            cause.is::<NotSupported>()
                || cause
                    .downcast_ref::<io::Error>()
                    .is_some_and(|err| err.kind() == io::ErrorKind::Unsupported)
        });

        if unsupported {
            ErrorKind::Fatal
        } else {
            ErrorKind::Transient
        }
    }
}

impl Classify for Infallible {
    fn error_kind(&self) -> ErrorKind {
        match *self {}
    }
}

impl<E: Classify + ?Sized> Classify for Box<E> {
    fn error_kind(&self) -> ErrorKind {
        (**self).error_kind()
    }
}

impl<E: Classify + ?Sized> Classify for Arc<E> {
    fn error_kind(&self) -> ErrorKind {
        (**self).error_kind()
    }
}

/// Configuration parse failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration string could not be parsed
    #[error("Invalid duration for {field}: {value:?}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
}
