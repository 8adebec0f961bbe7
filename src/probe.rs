//! Command-line health probe
//!
//! The same check the widget runs from the browser, for operators verifying a
//! backend from a terminal: one `GET <api>/health`, no cookies, no retry,
//! mapped onto the widget's [`ProbeResult`] and status line.

use std::time::Duration;

use sasha_widget::probe::{health_url, ProbeResult};

/// Default request timeout for the CLI probe
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Run one probe against `api_base`
pub async fn probe(api_base: &str, timeout: Duration) -> ProbeResult {
    let Some(url) = health_url(api_base) else {
        return ProbeResult::Unset;
    };

    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build HTTP client: {}", e);
            return ProbeResult::Error;
        }
    };

    match client.get(&url).send().await {
        Ok(response) => {
            tracing::debug!(url = %url, status = response.status().as_u16(), "Probe answered");
            ProbeResult::from_status(response.status().as_u16())
        }
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Probe failed");
            ProbeResult::Error
        }
    }
}
