//! # Sasha
//!
//! Development host for the Sasha embeddable widget. The widget itself lives
//! in the `sasha-widget` crate and compiles to WebAssembly; this crate serves
//! it to a browser under conditions that try to break it.
//!
//! ## Modules
//!
//! - [`api`]: Axum server with the demo host page, the widget bundle and the
//!   `/health` contract the widget probes
//! - [`config`]: TOML + environment configuration
//! - [`probe`]: the widget's health probe, runnable from a terminal
//!
//! ## Quick Start
//!
//! ```text
//! wasm-pack build sasha-widget --target web
//! cargo run -- serve
//! open http://127.0.0.1:8090/
//! ```

pub mod api;
pub mod config;
pub mod probe;

pub use api::{build_router, serve, ApiError, AppState};
pub use config::{Config, ConfigError, LoggingConfig, ServerConfig, WidgetSettings};
pub use sasha_widget::ProbeResult;
