//! Browser-driven form-interaction and assertion harness
//!
//! This crate drives a real browser against a hosted sign-in/sign-up web
//! application and asserts its form-validation rules, authentication flow and
//! navigation behavior. Four components cooperate, strictly sequentially:
//!
//! - **Session lifecycle** ([`session`]): one browser session per suite,
//!   started once, stopped once, injected into every case
//! - **Page navigation** ([`page`]): synchronous-feeling navigation plus the
//!   single bounded-poll wait primitive
//! - **Form interaction** ([`form`]): configured locators, field mutation,
//!   and validation-state readback; clicks report refusal as a value
//! - **Assertion and reporting** ([`report`]): per-case state machine, an
//!   append-only `timestamp - message` report sink, aggregate summaries
//!
//! # Example
//!
//! ```no_run
//! use auth_harness::{config::Config, report::Recorder, suite::Suite, suites};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default_suite()?;
//! let recorder = Recorder::to_file("test_report.txt")?;
//!
//! let suite = Suite::start("sign-in", config, recorder).await?;
//! suites::sign_in::run(&suite).await;
//! let summary = suite.finish().await;
//!
//! assert!(summary.all_passed());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod form;
pub mod page;
pub mod report;
pub mod session;
pub mod suite;
pub mod suites;

// Re-export main types for convenience
pub use config::Config;
pub use error::{HarnessError, HarnessResult};
pub use form::{ClickOutcome, ExpectedOutcome, FieldLocator, FormCase};
pub use page::{Tab, WaitCondition};
pub use report::{CaseStatus, Recorder, SuiteSummary};
pub use session::{Session, SessionConfig};
pub use suite::Suite;
