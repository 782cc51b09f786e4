use std::time::Duration;

/// Engine timing tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Pause between two pool reconciliation steps
    pub reconcile_interval: Duration,
    /// Re-check interval of the metronome while the target rate is zero
    pub idle_poll_interval: Duration,
    /// Span over which the current dispatch rate is averaged
    pub rate_window: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reconcile_interval: Duration::from_millis(50),
            idle_poll_interval: Duration::from_millis(100),
            rate_window: Duration::from_secs(5),
        }
    }
}
