//! Error types for the harness
//!
//! Per-case failures are values of this enum and are converted into failed
//! case records at the case boundary (see [`crate::report::Case`]); they never
//! abort sibling cases. The one fatal variant is [`HarnessError::SessionStart`]:
//! without a browser session no case can run.
//!
//! Note that "element not interactable" is deliberately *absent* here. A
//! rejected click is an expected outcome in negative-path cases, so it is
//! modeled as [`crate::form::ClickOutcome::Rejected`] rather than an error.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("element not found within {timeout:?}: {selector}")]
    ElementNotFound { selector: String, timeout: Duration },

    #[error("expected state never reached: {condition} (waited {timeout:?})")]
    WaitTimeout { condition: String, timeout: Duration },

    #[error("assertion failed: {description} (expected {expected}, got {actual})")]
    Assertion {
        description: String,
        expected: String,
        actual: String,
    },

    #[error("browser session could not be started: {0}")]
    SessionStart(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("browser transport error: {0}")]
    Transport(#[from] chromiumoxide::error::CdpError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Whether this error aborts the whole run rather than a single case.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HarnessError::SessionStart(_) | HarnessError::Config(_))
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
