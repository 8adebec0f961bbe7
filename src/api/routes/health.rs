//! Health Routes
//!
//! The backend side of the widget's probe contract.
//!
//! - GET /health - Health status, always 200
//! - GET /health/live - Liveness probe
//! - GET /simulate/:code/health - Answers with `code`, for exercising the
//!   widget's failure path (`data-api="http://host/simulate/503"`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

pub const SERVICE_NAME: &str = "sasha-devserver";

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(health_body(&state, "healthy"))
}

/// GET /simulate/:code/health
pub async fn simulated(
    State(state): State<Arc<AppState>>,
    Path(code): Path<u16>,
) -> ApiResult<(StatusCode, Json<HealthResponse>)> {
    let status = StatusCode::from_u16(code)
        .ok()
        .filter(|s| !s.is_informational())
        .ok_or_else(|| ApiError::Validation(format!("cannot simulate status {}", code)))?;

    tracing::debug!(status = code, "Serving simulated health status");
    Ok((status, Json(health_body(&state, "simulated"))))
}

fn health_body(state: &AppState, status: &str) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        checked_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
