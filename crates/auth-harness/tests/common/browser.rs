//! Browser session helpers for integration tests

use std::path::{Path, PathBuf};

use auth_harness::config::TimeoutConfig;
use auth_harness::session::{Session, SessionConfig};
use auth_harness::HarnessError;

/// Check if browser tests should be skipped (when Chrome isn't available)
pub fn should_skip() -> bool {
    std::env::var_os("SKIP_BROWSER_TESTS").is_some()
}

/// Macro to skip test if Chrome isn't available
#[macro_export]
macro_rules! skip_if_no_chrome {
    () => {
        if browser::should_skip() {
            eprintln!("Skipping: browser tests disabled via SKIP_BROWSER_TESTS");
            return;
        }
    };
}

/// Where the Chrome for Testing binary sits inside one versioned entry of
/// the puppeteer cache, per platform
const CHROME_LAYOUTS: [&str; 3] = [
    "chrome-linux64/chrome",
    "chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
    "chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing",
];

/// Find Chrome for Testing installed by Puppeteer, newest version first
pub fn find_chrome_for_testing() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let cache = Path::new(&home).join(".cache/puppeteer/chrome");

    let mut versions: Vec<PathBuf> = std::fs::read_dir(&cache)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    versions.sort_by(|a, b| b.cmp(a));

    versions.iter().find_map(|version| {
        CHROME_LAYOUTS
            .iter()
            .map(|layout| version.join(layout))
            .find(|candidate| candidate.exists())
    })
}

/// Wait budgets short enough for tests that exercise timeout paths
#[allow(dead_code)]
pub fn fast_timeouts() -> TimeoutConfig {
    TimeoutConfig {
        implicit_ms: 1_000,
        explicit_ms: 1_000,
        poll_ms: 100,
        settle_ms: 400,
    }
}

/// Try to start a session, skip the test if Chrome isn't installed
#[allow(dead_code)]
pub async fn require_session(timeouts: TimeoutConfig) -> Option<Session> {
    let config = SessionConfig {
        timeouts,
        chrome_executable: find_chrome_for_testing(),
        ..SessionConfig::default()
    };
    match Session::start(&config).await {
        Ok(session) => Some(session),
        Err(HarnessError::SessionStart(msg)) if msg.contains("Could not auto detect") => {
            eprintln!("Skipping: Chrome not installed ({})", msg);
            None
        }
        Err(e) => panic!("Unexpected session error: {}", e),
    }
}
