//! Driver seam for browser automation engines
//!
//! A concrete engine (CDP, WebDriver, ...) implements [`Driver`]. Callers talk
//! to it through [`RobustDriver`], which retries lookups and actions through
//! transient page turbulence and waits for content to appear or disappear.

pub mod driver;
pub mod errors;
mod robust;

pub use driver::{Driver, Node};
pub use errors::DriverError;
pub use robust::RobustDriver;
