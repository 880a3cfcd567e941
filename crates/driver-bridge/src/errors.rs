//! Driver error types

use holdfast_robustness::{Classify, ErrorKind};
use thiserror::Error;

/// Errors raised by a [`Driver`](crate::Driver) implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The engine cannot perform this operation at all
    #[error("Not supported by this driver: {0}")]
    NotSupported(String),

    /// No element matched the locator (yet)
    #[error("Missing element: {0}")]
    MissingElement(String),

    /// The element was detached or re-rendered between lookup and use
    #[error("Stale element: {0}")]
    Stale(String),

    /// Anything else the engine reported
    #[error("Driver error: {0}")]
    Other(String),
}

impl DriverError {
    pub fn missing(locator: impl Into<String>) -> Self {
        DriverError::MissingElement(locator.into())
    }

    pub fn not_supported(operation: impl Into<String>) -> Self {
        DriverError::NotSupported(operation.into())
    }
}

impl Classify for DriverError {
    fn error_kind(&self) -> ErrorKind {
        match self {
            DriverError::NotSupported(_) => ErrorKind::Fatal,
            DriverError::MissingElement(_) | DriverError::Stale(_) | DriverError::Other(_) => {
                ErrorKind::Transient
            }
        }
    }
}
