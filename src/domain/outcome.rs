use crate::domain::errors::RequestError;
use std::time::Duration;

/// Status code recorded when no response was obtained.
pub const NO_RESPONSE_STATUS: u16 = 0;

/// Result of one request attempt. Produced by a `RequestIssuer` and consumed
/// immediately by the outcome recorder; never stored.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub duration: Duration,
    /// HTTP status, or [`NO_RESPONSE_STATUS`] when the transport failed
    pub status_code: u16,
    pub error: Option<RequestError>,
}

impl Outcome {
    pub fn success(duration: Duration, status_code: u16) -> Self {
        Self {
            duration,
            status_code,
            error: None,
        }
    }

    pub fn failure(duration: Duration, error: RequestError) -> Self {
        Self {
            duration,
            status_code: NO_RESPONSE_STATUS,
            error: Some(error),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Label used for the per-status-code counter.
    pub fn status_label(&self) -> String {
        self.status_code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_uses_sentinel_status() {
        let outcome = Outcome::failure(Duration::from_millis(3), RequestError::Timeout);
        assert!(outcome.is_failure());
        assert_eq!(outcome.status_code, NO_RESPONSE_STATUS);
        assert_eq!(outcome.status_label(), "0");
    }

    #[test]
    fn test_success_keeps_status() {
        let outcome = Outcome::success(Duration::from_millis(3), 503);
        assert!(!outcome.is_failure());
        assert_eq!(outcome.status_label(), "503");
    }
}
