use crate::domain::Outcome;
use crate::domain::ports::MetricsSink;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns request outcomes into telemetry.
///
/// Sink failures are logged and dropped; recording never fails the caller.
#[derive(Clone)]
pub struct OutcomeRecorder {
    sink: Arc<dyn MetricsSink>,
}

impl OutcomeRecorder {
    pub fn new(sink: Arc<dyn MetricsSink>) -> Self {
        Self { sink }
    }

    pub fn record(&self, worker_id: u64, outcome: &Outcome) {
        if let Err(e) = self.sink.inc_requests() {
            warn!(worker_id, "OutcomeRecorder: failed to count request: {}", e);
        }

        let status = outcome.status_label();
        if let Err(e) = self.sink.inc_status(&status) {
            warn!(worker_id, status = %status, "OutcomeRecorder: failed to count status: {}", e);
        }

        let seconds = outcome.duration.as_secs_f64();
        if let Err(e) = self.sink.observe_duration(seconds) {
            warn!(worker_id, "OutcomeRecorder: failed to observe duration: {}", e);
        }

        match &outcome.error {
            Some(err) => warn!(
                worker_id,
                kind = err.category(),
                duration_ms = outcome.duration.as_millis() as u64,
                "Request failed: {}",
                err
            ),
            None => debug!(
                worker_id,
                status = outcome.status_code,
                duration_ms = outcome.duration.as_millis() as u64,
                "Request completed"
            ),
        }
    }
}
