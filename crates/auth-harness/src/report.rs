//! Assertion and reporting layer
//!
//! The [`Recorder`] is the suite's report sink: an append-only log of
//! `timestamp - message` lines plus the structured per-case records that
//! aggregate into a [`SuiteSummary`]. Every logical operation (navigation,
//! field fill, wait, assertion) is logged with its elapsed time.
//!
//! A [`Case`] tracks one test case through its state machine:
//!
//! ```text
//! NotStarted → Navigated → FormPopulated → Submitted → Asserted → {Passed | Failed}
//! ```
//!
//! `Failed` is reachable from any phase: a lookup or wait that errors before
//! the assertion concludes the case right there. Errors are converted into
//! failed records at this boundary and never abort sibling cases.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::error::{HarnessError, HarnessResult};

/// How far through its state machine a case got
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Navigated,
    FormPopulated,
    Submitted,
    Asserted,
}

/// Terminal state of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    Passed,
    Failed,
}

/// Structured result of one test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub description: String,
    pub status: CaseStatus,
    /// The last phase the case reached before concluding
    pub phase: Phase,
    pub elapsed_ms: u64,
    /// Failure detail, carrying both values for assertion mismatches
    pub detail: Option<String>,
}

/// Aggregate result of a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub suite: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub records: Vec<CaseRecord>,
}

impl SuiteSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

struct RecorderInner {
    sink: Option<File>,
    records: Vec<CaseRecord>,
}

/// Append-only report sink shared by every case of a suite
pub struct Recorder {
    inner: Mutex<RecorderInner>,
}

impl Recorder {
    /// Record to an append-only file (`timestamp - message` per line)
    pub fn to_file<P: AsRef<Path>>(path: P) -> HarnessResult<Self> {
        let sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            inner: Mutex::new(RecorderInner {
                sink: Some(sink),
                records: Vec::new(),
            }),
        })
    }

    /// Record in memory only (unit tests, dry runs)
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(RecorderInner {
                sink: None,
                records: Vec::new(),
            }),
        }
    }

    /// Append one timestamped line to the report
    ///
    /// The report is for later human inspection; failures to write it are
    /// logged and swallowed rather than failing the test run.
    pub fn log(&self, message: &str) {
        info!("{}", message);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(sink) = inner.sink.as_mut() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            if let Err(e) = writeln!(sink, "{} - {}", timestamp, message) {
                warn!("Could not append to report file: {}", e);
            }
        }
    }

    fn push(&self, record: CaseRecord) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.records.push(record);
    }

    /// Aggregate everything recorded so far
    pub fn summary(&self, suite: &str, duration_ms: u64) -> SuiteSummary {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let passed = inner
            .records
            .iter()
            .filter(|r| r.status == CaseStatus::Passed)
            .count();
        SuiteSummary {
            suite: suite.to_string(),
            total: inner.records.len(),
            passed,
            failed: inner.records.len() - passed,
            duration_ms,
            records: inner.records.clone(),
        }
    }
}

/// One test case in flight
///
/// Created at the top of a case, advanced through [`Case::phase`] as the case
/// progresses, and concluded exactly once with the case body's result.
pub struct Case<'a> {
    recorder: &'a Recorder,
    description: String,
    phase: Cell<Phase>,
    started: Instant,
}

impl<'a> Case<'a> {
    pub fn begin(recorder: &'a Recorder, description: &str) -> Self {
        recorder.log(&format!("case started: {}", description));
        Self {
            recorder,
            description: description.to_string(),
            phase: Cell::new(Phase::NotStarted),
            started: Instant::now(),
        }
    }

    /// Advance the state machine (never moves backwards)
    pub fn phase(&self, phase: Phase) {
        if phase > self.phase.get() {
            self.phase.set(phase);
            self.step(&format!("reached {:?}", phase));
        }
    }

    /// Log one step of the case with its elapsed time
    pub fn step(&self, message: &str) {
        self.recorder.log(&format!(
            "{}: {} (+{}ms)",
            self.description,
            message,
            self.started.elapsed().as_millis()
        ));
    }

    /// Convert the case body's result into a terminal record
    ///
    /// This is the per-case error boundary: every [`HarnessError`] becomes a
    /// failed record here instead of propagating to sibling cases.
    pub fn conclude(self, outcome: HarnessResult<()>) -> CaseStatus {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        let (status, detail) = match outcome {
            Ok(()) => {
                self.recorder.log(&format!(
                    "case passed: {} ({}ms)",
                    self.description, elapsed_ms
                ));
                (CaseStatus::Passed, None)
            }
            Err(e) => {
                if let HarnessError::Transport(_) = &e {
                    error!("unanticipated automation error in '{}': {}", self.description, e);
                }
                self.recorder.log(&format!(
                    "case failed: {} ({}ms): {}",
                    self.description, elapsed_ms, e
                ));
                (CaseStatus::Failed, Some(e.to_string()))
            }
        };

        self.recorder.push(CaseRecord {
            description: self.description,
            status,
            phase: self.phase.get(),
            elapsed_ms,
            detail,
        });
        status
    }
}

/// Compare an observation against an expectation
///
/// # Errors
///
/// [`HarnessError::Assertion`] carrying the description and both values.
pub fn expect<T: PartialEq + Debug>(actual: T, expected: T, description: &str) -> HarnessResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::Assertion {
            description: description.to_string(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

/// [`expect`] for bare boolean conditions
pub fn expect_true(condition: bool, description: &str) -> HarnessResult<()> {
    expect(condition, true, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_expect_records_both_values() {
        let err = expect(3, 4, "field count").unwrap_err();
        match err {
            HarnessError::Assertion {
                description,
                expected,
                actual,
            } => {
                assert_eq!(description, "field count");
                assert_eq!(expected, "4");
                assert_eq!(actual, "3");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_expect_passes_on_equal() {
        assert!(expect("a", "a", "eq").is_ok());
        assert!(expect_true(true, "cond").is_ok());
        assert!(expect_true(false, "cond").is_err());
    }

    #[test]
    fn test_case_records_pass() {
        let recorder = Recorder::in_memory();
        let case = Case::begin(&recorder, "sample case");
        case.phase(Phase::Navigated);
        case.phase(Phase::Asserted);
        let status = case.conclude(Ok(()));
        assert_eq!(status, CaseStatus::Passed);

        let summary = recorder.summary("demo", 10);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 0);
        assert!(summary.all_passed());
        assert_eq!(summary.records[0].phase, Phase::Asserted);
    }

    #[test]
    fn test_case_failure_does_not_affect_siblings() {
        let recorder = Recorder::in_memory();

        let failing = Case::begin(&recorder, "failing case");
        failing.phase(Phase::Navigated);
        let status = failing.conclude(Err(HarnessError::WaitTimeout {
            condition: "url contains 'panel'".to_string(),
            timeout: Duration::from_secs(10),
        }));
        assert_eq!(status, CaseStatus::Failed);

        let passing = Case::begin(&recorder, "passing case");
        passing.phase(Phase::Asserted);
        assert_eq!(passing.conclude(Ok(())), CaseStatus::Passed);

        let summary = recorder.summary("demo", 10);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.all_passed());

        let failed = &summary.records[0];
        assert_eq!(failed.phase, Phase::Navigated);
        assert!(failed.detail.as_deref().unwrap().contains("expected state never reached"));
    }

    #[test]
    fn test_phase_never_moves_backwards() {
        let recorder = Recorder::in_memory();
        let case = Case::begin(&recorder, "phases");
        case.phase(Phase::Submitted);
        case.phase(Phase::Navigated);
        case.conclude(Ok(()));

        let summary = recorder.summary("demo", 0);
        assert_eq!(summary.records[0].phase, Phase::Submitted);
    }

    #[test]
    fn test_file_recorder_appends_timestamped_lines() {
        let path = std::env::temp_dir().join(format!(
            "auth-harness-report-{}-{}.txt",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));

        let recorder = Recorder::to_file(&path).unwrap();
        recorder.log("first line");
        recorder.log("second line");
        drop(recorder);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" - first line"));
        assert!(lines[1].contains(" - second line"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_summary_serializes() {
        let recorder = Recorder::in_memory();
        Case::begin(&recorder, "case").conclude(Ok(()));
        let summary = recorder.summary("sign-in", 42);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("sign-in"));
        assert!(json.contains("Passed"));
    }
}
