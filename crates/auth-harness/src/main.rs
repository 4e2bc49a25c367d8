//! Suite runner binary
//!
//! Runs the sign-in suite and then the sign-up suite against the hosted
//! application, each with its own report file, and exits non-zero when any
//! case failed. Configuration comes from the path in `SUITE_CONFIG` when set,
//! otherwise from the embedded default.

use anyhow::Result;
use tracing::{error, info};

use auth_harness::report::Recorder;
use auth_harness::suite::Suite;
use auth_harness::{suites, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("SUITE_CONFIG") {
        Ok(path) => {
            info!("loading suite configuration from {}", path);
            Config::from_file(&path)?
        }
        Err(_) => Config::default_suite()?,
    };

    // The report file names match what consumers of the previous reports
    // already collect.
    let recorder = Recorder::to_file("test_report.txt")?;
    let suite = Suite::start("sign-in", config.clone(), recorder).await?;
    suites::sign_in::run(&suite).await;
    let sign_in = suite.finish().await;

    let recorder = Recorder::to_file("test_report_sign_up.txt")?;
    let suite = Suite::start("sign-up", config, recorder).await?;
    suites::sign_up::run(&suite).await;
    let sign_up = suite.finish().await;

    let failed = sign_in.failed + sign_up.failed;
    if failed > 0 {
        error!("{} case(s) failed", failed);
        std::process::exit(1);
    }
    info!("all cases passed");
    Ok(())
}
