//! Suite lifecycle
//!
//! A [`Suite`] ties together the three long-lived pieces every test case
//! needs: the configuration, the single browser [`Session`], and the
//! [`Recorder`]. The session is injected into each case by reference;
//! there is no hidden class-level driver state.
//!
//! Lifecycle guarantees:
//! - session start happens exactly once, before any case; failure is fatal
//! - cases run strictly sequentially, each against a freshly opened tab
//! - [`Suite::finish`] stops the session exactly once, regardless of how
//!   many cases failed

use std::time::Instant;
use tracing::info;

use crate::config::{Config, PageSelectors};
use crate::error::{HarnessError, HarnessResult};
use crate::form::{fill_form, FormCase};
use crate::report::{Case, CaseStatus, Phase, Recorder, SuiteSummary};
use crate::session::{Session, SessionConfig};

/// One suite: configuration + session + report sink
pub struct Suite {
    name: String,
    pub config: Config,
    pub session: Session,
    pub recorder: Recorder,
    started: Instant,
}

impl Suite {
    /// Start the suite: open the report sink's session and the browser
    ///
    /// # Errors
    ///
    /// [`HarnessError::SessionStart`] when the browser fails to launch. This
    /// is fatal, the run cannot proceed.
    pub async fn start(name: &str, config: Config, recorder: Recorder) -> HarnessResult<Self> {
        recorder.log(&format!("suite started: {}", name));
        let session =
            Session::start(&SessionConfig::from_timeouts(config.timeouts.clone())).await?;
        Ok(Self {
            name: name.to_string(),
            config,
            session,
            recorder,
            started: Instant::now(),
        })
    }

    /// Begin a new case against this suite's recorder
    pub fn case(&self, description: &str) -> Case<'_> {
        Case::begin(&self.recorder, description)
    }

    /// Run one table-driven form case: navigate fresh, populate, observe,
    /// compare
    ///
    /// Each row of a table is its own case, so one failing row never aborts
    /// its siblings.
    pub async fn run_form_case(
        &self,
        url: &str,
        selectors: &PageSelectors,
        form_case: &FormCase,
    ) -> CaseStatus {
        let case = self.case(&form_case.description);
        let result = async {
            let tab = self.session.open(url).await?;
            case.phase(Phase::Navigated);

            fill_form(&tab, selectors, &form_case.fields).await?;
            case.phase(Phase::FormPopulated);

            let observed = form_case
                .expected
                .observe(&tab, selectors, &self.config.validation)
                .await?;
            case.phase(Phase::Asserted);

            if form_case.expected.matches(&observed) {
                Ok(())
            } else {
                Err(HarnessError::Assertion {
                    description: form_case.description.clone(),
                    expected: form_case.expected.describe(),
                    actual: format!("{:?}", observed),
                })
            }
        }
        .await;
        case.conclude(result)
    }

    /// Tear the suite down and aggregate its results
    ///
    /// The session stop is unconditional; it runs after failed cases exactly
    /// as it does after passing ones.
    pub async fn finish(self) -> SuiteSummary {
        self.session.stop().await;
        let summary = self
            .recorder
            .summary(&self.name, self.started.elapsed().as_millis() as u64);
        self.recorder.log(&format!(
            "suite finished: {}: {} passed, {} failed ({}ms)",
            summary.suite, summary.passed, summary.failed, summary.duration_ms
        ));
        info!(
            "Suite '{}': {}/{} cases passed",
            summary.suite, summary.passed, summary.total
        );
        summary
    }
}
