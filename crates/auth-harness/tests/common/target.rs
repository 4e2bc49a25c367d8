//! Remote target helpers

/// Check if the hosted application answers at all
pub async fn is_target_reachable(url: &str) -> bool {
    match reqwest::get(url).await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

/// Macro to skip test if the hosted application isn't reachable
#[macro_export]
macro_rules! require_target {
    ($url:expr) => {{
        if !target::is_target_reachable($url).await {
            eprintln!("Skipping: target application not reachable at {}", $url);
            return;
        }
    }};
}
