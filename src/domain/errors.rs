use thiserror::Error;

/// Transport-level failures of a single request attempt.
///
/// These never leave the worker that produced them: they are recorded under
/// the sentinel status code and logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("request timed out")]
    Timeout,

    #[error("connection error: {message}")]
    Connection { message: String },

    #[error("failed to drain response body: {message}")]
    Body { message: String },

    #[error("request failed: {message}")]
    Other { message: String },
}

impl RequestError {
    /// Short category name, used in log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection { .. } => "connection",
            Self::Body { .. } => "body",
            Self::Other { .. } => "other",
        }
    }
}

/// Errors raised by the telemetry sink. Callers swallow them.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics registry error: {0}")]
    Registry(#[from] prometheus::Error),

    #[error("latency histogram error: {reason}")]
    Histogram { reason: String },
}

/// Errors related to process configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid target URL '{url}': {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("Invalid {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}
