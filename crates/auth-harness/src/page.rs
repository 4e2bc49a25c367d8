//! Page navigation and bounded waits
//!
//! [`Tab`] wraps a browser page together with the session's wait budgets.
//! [`Tab::wait_until`] is the only suspension point in the harness: a
//! single-threaded poll of one named condition at a bounded interval, failing
//! with [`HarnessError::WaitTimeout`] on expiry. A timed-out wait fails the
//! check it belongs to, never the session.

use chromiumoxide::Page;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::TimeoutConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::form::{element_is_displayed, FieldLocator};

/// A single browser tab plus this session's wait budgets
pub struct Tab {
    page: Page,
    timeouts: TimeoutConfig,
}

impl Tab {
    pub(crate) fn new(page: Page, timeouts: TimeoutConfig) -> Self {
        Self { page, timeouts }
    }

    /// Load `url` and block until the browser reports the load complete
    pub async fn navigate(&self, url: &str) -> HarnessResult<()> {
        debug!("Navigating to: {}", url);
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// The tab's current URL
    pub async fn current_url(&self) -> HarnessResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// Poll `condition` until it holds or `timeout` elapses
    pub async fn wait_until(
        &self,
        condition: &WaitCondition,
        timeout: Duration,
    ) -> HarnessResult<()> {
        let deadline = Instant::now() + timeout;
        debug!("Waiting up to {:?} for {}", timeout, condition.describe());

        loop {
            if condition.check(self).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::WaitTimeout {
                    condition: condition.describe(),
                    timeout,
                });
            }
            tokio::time::sleep(self.timeouts.poll()).await;
        }
    }

    /// [`Tab::wait_until`] with the configured explicit-wait budget
    pub async fn wait_until_default(&self, condition: &WaitCondition) -> HarnessResult<()> {
        self.wait_until(condition, self.timeouts.explicit()).await
    }

    /// Confirm that `condition` does *not* become true within the settle
    /// window. This is how "the URL stayed put" and "the toast never showed"
    /// negative checks are expressed without fixed sleeps: the poll's timeout
    /// is the passing outcome.
    pub async fn confirm_absent(&self, condition: &WaitCondition) -> HarnessResult<bool> {
        match self.wait_until(condition, self.timeouts.settle()).await {
            Ok(()) => Ok(false),
            Err(HarnessError::WaitTimeout { .. }) => Ok(true),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn page(&self) -> &Page {
        &self.page
    }

    pub(crate) fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }
}

/// A named condition for [`Tab::wait_until`]
#[derive(Debug, Clone, PartialEq)]
pub enum WaitCondition {
    /// An element matching the locator exists in the DOM
    ElementLocated(FieldLocator),
    /// An element matching the locator exists and is displayed
    ElementVisible(FieldLocator),
    /// An element matching the locator is displayed with exactly this
    /// (trimmed) text
    ElementTextIs { locator: FieldLocator, text: String },
    /// The tab's URL equals the given string
    UrlIs(String),
    /// The tab's URL contains the given fragment
    UrlContains(String),
}

impl WaitCondition {
    /// One non-blocking evaluation of the condition
    pub(crate) async fn check(&self, tab: &Tab) -> HarnessResult<bool> {
        match self {
            WaitCondition::ElementLocated(locator) => {
                Ok(locator.resolve(tab.page()).await?.is_some())
            }
            WaitCondition::ElementVisible(locator) => {
                match locator.resolve(tab.page()).await? {
                    Some(element) => element_is_displayed(&element).await,
                    None => Ok(false),
                }
            }
            WaitCondition::ElementTextIs { locator, text } => {
                match locator.resolve(tab.page()).await? {
                    Some(element) => {
                        if !element_is_displayed(&element).await? {
                            return Ok(false);
                        }
                        let actual = element.inner_text().await?.unwrap_or_default();
                        Ok(actual.trim() == text)
                    }
                    None => Ok(false),
                }
            }
            WaitCondition::UrlIs(url) => Ok(tab.current_url().await? == *url),
            WaitCondition::UrlContains(fragment) => {
                Ok(tab.current_url().await?.contains(fragment))
            }
        }
    }

    /// Human-readable form used in timeout errors and the report log
    pub fn describe(&self) -> String {
        match self {
            WaitCondition::ElementLocated(locator) => {
                format!("element located: {}", locator.describe())
            }
            WaitCondition::ElementVisible(locator) => {
                format!("element visible: {}", locator.describe())
            }
            WaitCondition::ElementTextIs { locator, text } => {
                format!("element {} shows '{}'", locator.describe(), text)
            }
            WaitCondition::UrlIs(url) => format!("url equals '{}'", url),
            WaitCondition::UrlContains(fragment) => format!("url contains '{}'", fragment),
        }
    }
}
