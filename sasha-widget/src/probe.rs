//! Health Probe
//!
//! A single, user-triggered `GET <api>/health`. Credentials are omitted so the
//! host page's cookies never travel to the third-party backend. There is no
//! retry and no cancellation; concurrent probes race and the last to resolve
//! owns the status line.

use gloo_net::http::Request;
use web_sys::RequestCredentials;

use crate::config::WidgetConfig;
use crate::debug;

/// Outcome of one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    /// No backend configured, no request was made
    Unset,
    /// Backend answered with a 2xx status
    Reachable,
    /// Backend answered with a non-success status
    Unreachable(u16),
    /// Request never produced a response (DNS, TLS, CORS, offline)
    Error,
}

impl ProbeResult {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            ProbeResult::Reachable
        } else {
            ProbeResult::Unreachable(status)
        }
    }

    /// Status line rendered into the panel
    pub fn message(&self) -> String {
        match self {
            ProbeResult::Unset => {
                "Frontend good ✅ no backend configured (set data-api to enable checks).".to_string()
            }
            ProbeResult::Reachable => "Backend connected ✅".to_string(),
            ProbeResult::Unreachable(status) => format!("Backend responded with status {}", status),
            ProbeResult::Error => "Could not reach backend ❌".to_string(),
        }
    }
}

/// Health endpoint for a base URL, `None` when no backend is configured
pub fn health_url(api_base_url: &str) -> Option<String> {
    if api_base_url.is_empty() {
        return None;
    }
    Some(format!("{}/health", api_base_url.trim_end_matches('/')))
}

/// Text shown while a probe is in flight
pub fn pending_message(url: &str) -> String {
    format!("Checking {}…", url)
}

/// Run one probe against the configured backend
pub async fn probe(config: &WidgetConfig) -> ProbeResult {
    let Some(url) = health_url(&config.api_base_url) else {
        return ProbeResult::Unset;
    };

    match Request::get(&url)
        .credentials(RequestCredentials::Omit)
        .send()
        .await
    {
        Ok(response) => {
            let result = ProbeResult::from_status(response.status());
            debug::log(&format!("probe {} -> {}", url, response.status()));
            result
        }
        Err(e) => {
            debug::log(&format!("probe {} failed: {}", url, e));
            ProbeResult::Error
        }
    }
}
