//! Browser session lifecycle
//!
//! One [`Session`] exists per suite. It is created once at suite start,
//! reused sequentially by every test case, and torn down exactly once at
//! suite end regardless of individual case outcomes. A failure to start the
//! session is fatal to the run; nothing can execute without it.
//!
//! # Example
//!
//! ```no_run
//! use auth_harness::session::{Session, SessionConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let session = Session::start(&SessionConfig::default()).await?;
//! let tab = session.open("https://example.com").await?;
//! session.stop().await;
//! # Ok(())
//! # }
//! ```

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::TimeoutConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::page::Tab;

/// Settings for launching the browser session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run without a visible window (default: true)
    pub headless: bool,
    /// Window size; stands in for "maximize" since headless Chrome has no
    /// window manager to maximize against
    pub window: (u32, u32),
    /// Wait budgets shared by every tab of this session
    pub timeouts: TimeoutConfig,
    /// Explicit Chrome binary, if auto-detection should be bypassed
    pub chrome_executable: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window: (1920, 1080),
            timeouts: TimeoutConfig::default(),
            chrome_executable: None,
        }
    }
}

impl SessionConfig {
    /// Session settings taken from a suite configuration
    pub fn from_timeouts(timeouts: TimeoutConfig) -> Self {
        Self {
            timeouts,
            ..Self::default()
        }
    }
}

/// The single browser session owned by a suite
pub struct Session {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
    timeouts: TimeoutConfig,
}

impl Session {
    /// Launch the browser and start processing its CDP events
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::SessionStart`], which is fatal to the run.
    pub async fn start(config: &SessionConfig) -> HarnessResult<Self> {
        info!("Launching browser session");

        let mut builder = BrowserConfig::builder().window_size(config.window.0, config.window.1);

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &config.chrome_executable {
            debug!("Using Chrome executable: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        // Unique user data directory so a stale profile from an aborted run
        // cannot wedge the launch.
        let user_data_dir = std::env::temp_dir().join(format!(
            "auth-harness-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        builder = builder.user_data_dir(user_data_dir);

        let browser_config = builder.build().map_err(HarnessError::SessionStart)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| HarnessError::SessionStart(e.to_string()))?;

        // Drain browser events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        info!("Browser session started");
        Ok(Self {
            browser,
            handler_task,
            timeouts: config.timeouts.clone(),
        })
    }

    /// Open a fresh tab and navigate it to `url`
    ///
    /// Every test case opens its own tab so no state bleeds across cases.
    pub async fn open(&self, url: &str) -> HarnessResult<Tab> {
        let page = self.browser.new_page("about:blank").await?;
        let tab = Tab::new(page, self.timeouts.clone());
        tab.navigate(url).await?;
        Ok(tab)
    }

    /// Wait budgets shared by this session's tabs
    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.timeouts
    }

    /// Terminate the session unconditionally
    ///
    /// Called at suite end even when cases failed. Errors during shutdown
    /// are logged, not propagated; there is nothing left to salvage.
    pub async fn stop(mut self) {
        info!("Closing browser session");
        if let Err(e) = self.browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        self.handler_task.abort();
    }
}
