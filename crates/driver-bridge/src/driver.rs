//! The operations a browser engine must expose

use crate::errors::DriverError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Handle to an element located by a driver
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    /// Engine-specific identity of the element
    pub id: String,

    /// Visible text at the time of lookup
    #[serde(default)]
    pub text: String,
}

impl Node {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

/// Browser engine contract.
///
/// Every call reflects the page as it is right now; retrying is the caller's
/// concern. Report operations the engine can never perform as
/// [`DriverError::NotSupported`] so they are not retried.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn find_button(&self, locator: &str) -> Result<Node, DriverError>;

    async fn find_link(&self, locator: &str) -> Result<Node, DriverError>;

    async fn find_field(&self, locator: &str) -> Result<Node, DriverError>;

    async fn find_css(&self, selector: &str) -> Result<Node, DriverError>;

    async fn find_xpath(&self, xpath: &str) -> Result<Node, DriverError>;

    async fn click(&self, node: &Node) -> Result<(), DriverError>;

    async fn visit(&self, url: &str) -> Result<(), DriverError>;

    /// Set the value of a form field
    async fn set(&self, node: &Node, value: &str) -> Result<(), DriverError>;

    /// Choose `option` in a select element
    async fn select(&self, node: &Node, option: &str) -> Result<(), DriverError>;

    async fn has_content(&self, text: &str) -> Result<bool, DriverError>;

    async fn has_css(&self, selector: &str) -> Result<bool, DriverError>;

    async fn has_xpath(&self, xpath: &str) -> Result<bool, DriverError>;
}
