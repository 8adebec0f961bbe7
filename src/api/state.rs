//! Application State
//!
//! Shared state accessible by all API handlers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ServerConfig, WidgetSettings};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub server: Arc<ServerConfig>,
    /// Anchor attributes rendered into the demo host page
    pub widget: Arc<WidgetSettings>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(server: ServerConfig, widget: WidgetSettings) -> Self {
        Self {
            server: Arc::new(server),
            widget: Arc::new(widget),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
