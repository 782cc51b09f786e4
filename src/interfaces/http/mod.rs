//! HTTP control surface
//!
//! Exposes the runtime configuration, a status projection and the metrics
//! registry. Everything else falls through to the static assets directory.

pub mod handlers;

use axum::{Router, routing::get};
use std::path::Path;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::application::config_store::ConfigStore;
use crate::application::system::SystemHandle;
use crate::application::throughput::ThroughputMeter;
use crate::domain::StatusSnapshot;
use crate::infrastructure::observability::Metrics;

/// Shared state of the control surface handlers
#[derive(Clone)]
pub struct ControlState {
    pub config: ConfigStore,
    pub metrics: Metrics,
    pub throughput: ThroughputMeter,
}

impl ControlState {
    pub fn new(config: ConfigStore, metrics: Metrics, throughput: ThroughputMeter) -> Self {
        Self {
            config,
            metrics,
            throughput,
        }
    }

    pub fn from_handle(handle: &SystemHandle) -> Self {
        Self::new(
            handle.config.clone(),
            handle.metrics.clone(),
            handle.throughput.clone(),
        )
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            request_per_second_target: self.config.target_rate(),
            request_per_second_current: self.throughput.per_second(),
        }
    }
}

/// Builds the control surface router. Static files are served from `assets`
/// when given.
pub fn router(state: ControlState, assets: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/metrics", get(handlers::metrics))
        .route("/api/status", get(handlers::get_status))
        .route(
            "/api/config",
            get(handlers::get_config).post(handlers::post_config),
        )
        .route("/version", get(handlers::version))
        .with_state(state);

    let app = match assets {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
}
