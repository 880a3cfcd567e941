//! Robust facade over a [`Driver`]

use crate::driver::{Driver, Node};
use crate::errors::DriverError;
use holdfast_robustness::{query_async, robustly_async, SharedConfig};
use std::future::Future;
use tracing::debug;

/// Applies the retry engines to every driver call.
///
/// Lookups and the action performed on the located element are retried
/// together, so an element re-rendered between the two is looked up again.
/// `has_*` queries wait for presence; `has_no_*` queries wait for absence.
pub struct RobustDriver<D> {
    driver: D,
    config: SharedConfig,
}

impl<D: Driver> RobustDriver<D> {
    pub fn new(driver: D, config: SharedConfig) -> Self {
        Self { driver, config }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn into_inner(self) -> D {
        self.driver
    }

    pub async fn visit(&self, url: &str) -> Result<(), DriverError> {
        debug!(url, "visiting");
        let driver = &self.driver;
        self.robustly(move || driver.visit(url)).await
    }

    pub async fn click_button(&self, locator: &str) -> Result<(), DriverError> {
        debug!(locator, "clicking button");
        let driver = &self.driver;
        self.robustly(move || async move {
            let node = driver.find_button(locator).await?;
            driver.click(&node).await
        })
        .await
    }

    pub async fn click_link(&self, locator: &str) -> Result<(), DriverError> {
        debug!(locator, "clicking link");
        let driver = &self.driver;
        self.robustly(move || async move {
            let node = driver.find_link(locator).await?;
            driver.click(&node).await
        })
        .await
    }

    pub async fn fill_in(&self, locator: &str, value: &str) -> Result<(), DriverError> {
        debug!(locator, "filling in field");
        let driver = &self.driver;
        self.robustly(move || async move {
            let node = driver.find_field(locator).await?;
            driver.set(&node, value).await
        })
        .await
    }

    /// Choose `option` in the select field found by `from`
    pub async fn select(&self, option: &str, from: &str) -> Result<(), DriverError> {
        debug!(option, from, "selecting option");
        let driver = &self.driver;
        self.robustly(move || async move {
            let node = driver.find_field(from).await?;
            driver.select(&node, option).await
        })
        .await
    }

    pub async fn find_css(&self, selector: &str) -> Result<Node, DriverError> {
        let driver = &self.driver;
        self.robustly(move || driver.find_css(selector)).await
    }

    pub async fn find_xpath(&self, xpath: &str) -> Result<Node, DriverError> {
        let driver = &self.driver;
        self.robustly(move || driver.find_xpath(xpath)).await
    }

    pub async fn has_content(&self, text: &str) -> Result<bool, DriverError> {
        let driver = &self.driver;
        self.query(move || driver.has_content(text), true).await
    }

    pub async fn has_no_content(&self, text: &str) -> Result<bool, DriverError> {
        let driver = &self.driver;
        let present = self.query(move || driver.has_content(text), false).await?;
        Ok(!present)
    }

    pub async fn has_css(&self, selector: &str) -> Result<bool, DriverError> {
        let driver = &self.driver;
        self.query(move || driver.has_css(selector), true).await
    }

    pub async fn has_no_css(&self, selector: &str) -> Result<bool, DriverError> {
        let driver = &self.driver;
        let present = self.query(move || driver.has_css(selector), false).await?;
        Ok(!present)
    }

    pub async fn has_xpath(&self, xpath: &str) -> Result<bool, DriverError> {
        let driver = &self.driver;
        self.query(move || driver.has_xpath(xpath), true).await
    }

    pub async fn has_no_xpath(&self, xpath: &str) -> Result<bool, DriverError> {
        let driver = &self.driver;
        let present = self.query(move || driver.has_xpath(xpath), false).await?;
        Ok(!present)
    }

    async fn robustly<T, F, Fut>(&self, op: F) -> Result<T, DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DriverError>>,
    {
        robustly_async(&self.config.snapshot(), op).await
    }

    async fn query<F, Fut>(&self, op: F, expected: bool) -> Result<bool, DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, DriverError>>,
    {
        query_async(&self.config.snapshot(), op, expected).await
    }
}
