//! Full suite runs against the hosted application
//!
//! These drive the real sign-in/sign-up pages end to end, so they need both
//! a local Chrome and network access to the target. Either missing piece
//! skips the test instead of failing it.
//!
//! Run with: cargo test -p auth-harness --test live_suites

#[path = "common/browser.rs"]
mod browser;
#[path = "common/target.rs"]
mod target;

use auth_harness::report::Recorder;
use auth_harness::suite::Suite;
use auth_harness::{suites, Config};

#[tokio::test]
async fn test_sign_in_suite_passes_against_live_target() {
    skip_if_no_chrome!();
    let config = Config::default_suite().expect("Embedded config should parse");
    require_target!(&config.app.sign_in_url);

    let suite = Suite::start("sign-in", config, Recorder::in_memory())
        .await
        .expect("Session should start");
    suites::sign_in::run(&suite).await;
    let summary = suite.finish().await;

    assert_eq!(summary.total, 5, "the sign-in suite has five cases");
    assert!(
        summary.all_passed(),
        "failed cases: {:?}",
        summary
            .records
            .iter()
            .filter(|r| !matches!(r.status, auth_harness::CaseStatus::Passed))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_sign_up_suite_passes_against_live_target() {
    skip_if_no_chrome!();
    let config = Config::default_suite().expect("Embedded config should parse");
    require_target!(&config.app.sign_up_url);

    let suite = Suite::start("sign-up", config, Recorder::in_memory())
        .await
        .expect("Session should start");
    suites::sign_up::run(&suite).await;
    let summary = suite.finish().await;

    // 4 name rows + 3 password rows + uniqueness + 5 gating rows + toast
    assert_eq!(summary.total, 14);
    assert!(
        summary.all_passed(),
        "failed cases: {:?}",
        summary
            .records
            .iter()
            .filter(|r| !matches!(r.status, auth_harness::CaseStatus::Passed))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_report_file_gets_timestamped_lines() {
    skip_if_no_chrome!();
    let config = Config::default_suite().expect("Embedded config should parse");

    let dir = std::env::temp_dir().join(format!("auth-harness-report-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("Should create temp dir");
    let path = dir.join("report.txt");

    let recorder = Recorder::to_file(&path).expect("Should open report file");
    let suite = Suite::start("sign-in", config, recorder)
        .await
        .expect("Session should start");
    let case = suite.case("report: a single logged step");
    case.step("probe");
    case.conclude(Ok(()));
    suite.finish().await;

    let contents = std::fs::read_to_string(&path).expect("Report file should exist");
    assert!(contents.contains("suite started: sign-in"));
    assert!(contents.contains("report: a single logged step"));
    // Every line carries the "timestamp - message" shape.
    for line in contents.lines() {
        assert!(line.contains(" - "), "malformed report line: {}", line);
    }

    let _ = std::fs::remove_dir_all(&dir);
}
