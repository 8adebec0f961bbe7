//! Dev Host HTTP API
//!
//! Serves everything needed to exercise the widget locally, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /` - Demo host page embedding the widget
//! - `GET /widget/*` - The `wasm-pack` bundle (`sasha_widget.js`, `.wasm`)
//! - `GET /health` - Health status (the widget probe's contract)
//! - `GET /health/live` - Liveness probe
//! - `GET /simulate/:code/health` - Health endpoint answering with `code`
//!
//! # Example
//!
//! ```rust,ignore
//! use sasha::api::{serve, AppState};
//! use sasha::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let state = AppState::new(config.server.clone(), config.widget.clone());
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/", get(routes::health::health))
        .route("/live", get(routes::health::liveness));

    let cors = cors_layer(&state.server.cors_origins);
    let widget_dir = ServeDir::new(&state.server.widget_dir);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::host_page::host_page))
        .nest("/health", health_routes)
        .route("/simulate/:code/health", get(routes::health::simulated))
        .nest_service("/widget", widget_dir)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Any origin when none are configured; the probe is always cross-origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
}

/// Start the dev host
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.server.addr();
    let widget_dir = state.server.widget_dir.clone();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Sasha dev host listening on http://{}", addr);
    tracing::info!("Serving widget bundle from {}", widget_dir);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Sasha dev host shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, WidgetSettings};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app(widget_dir: &std::path::Path) -> Router {
        let server = ServerConfig {
            widget_dir: widget_dir.to_string_lossy().to_string(),
            ..ServerConfig::default()
        };
        build_router(AppState::new(server, WidgetSettings::default()))
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = get(create_test_app(dir.path()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "sasha-devserver");
    }

    #[tokio::test]
    async fn test_health_live() {
        let dir = tempfile::tempdir().unwrap();
        let response = get(create_test_app(dir.path()), "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_simulated_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = get(create_test_app(dir.path()), "/simulate/503/health").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = get(create_test_app(dir.path()), "/simulate/42/health").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_allows_cross_origin_probe() {
        let dir = tempfile::tempdir().unwrap();
        let response = create_test_app(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("Origin", "https://shop.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_host_page() {
        let dir = tempfile::tempdir().unwrap();
        let response = get(create_test_app(dir.path()), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains(r#"id="sasha-widget""#));
        assert!(body.contains("/widget/sasha_widget.js"));
    }

    #[tokio::test]
    async fn test_widget_bundle_is_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sasha_widget.js"), "export default function init() {}")
            .unwrap();

        let response = get(create_test_app(dir.path()), "/widget/sasha_widget.js").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("export default"));

        let response = get(create_test_app(dir.path()), "/widget/missing.wasm").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
