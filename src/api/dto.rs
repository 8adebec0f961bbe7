//! Data Transfer Objects
//!
//! Response types for the dev host endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response, the contract the widget probe consumes.
/// The widget only looks at the status code; the body is for humans.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `simulated` for `/simulate/:code/health`
    pub status: String,
    /// Service name
    pub service: String,
    /// Application version
    pub version: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// When this response was produced
    pub checked_at: DateTime<Utc>,
}
