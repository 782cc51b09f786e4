//! Control surface handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::LoadConfig;
use crate::domain::ports::MetricsSink;
use crate::interfaces::http::ControlState;

pub const NAME: &str = "dynamic load generator";

/// Control surface failures. Every variant maps to HTTP 500 with the message
/// as plain-text body.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("{0}")]
    Decode(serde_json::Error),

    #[error("{0}")]
    Encode(serde_json::Error),

    #[error("{0}")]
    Metrics(#[from] crate::domain::errors::MetricsError),
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

fn json_response<T: serde::Serialize>(value: &T) -> Result<Response, ControlError> {
    let body = serde_json::to_vec(value).map_err(ControlError::Encode)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// `GET /api/status`
pub async fn get_status(State(state): State<ControlState>) -> Result<Response, ControlError> {
    json_response(&state.status())
}

/// `GET /api/config`
pub async fn get_config(State(state): State<ControlState>) -> Result<Response, ControlError> {
    json_response(&state.config.get())
}

/// `POST /api/config`: replaces the whole configuration.
///
/// A body that fails to decode leaves the configuration untouched.
pub async fn post_config(
    State(state): State<ControlState>,
    body: Bytes,
) -> Result<Response, ControlError> {
    let config: LoadConfig = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected configuration update: {}", e);
        ControlError::Decode(e)
    })?;

    state.config.replace_with(config.clone(), |current| {
        state.metrics.set_target_rate(current.requests_per_second_target)
    });
    info!(
        "Configuration replaced (url: {}, clients: {}, rate: {}/s)",
        config.url, config.clients, config.requests_per_second_target
    );

    json_response(&config)
}

/// `GET /metrics`
pub async fn metrics(State(state): State<ControlState>) -> Result<Response, ControlError> {
    let body = state.metrics.render()?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// `GET /version`
pub async fn version() -> impl IntoResponse {
    format!("{} {}", NAME, env!("CARGO_PKG_VERSION"))
}
