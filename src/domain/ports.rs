use crate::domain::errors::MetricsError;
use crate::domain::outcome::Outcome;
use async_trait::async_trait;

/// Performs one unit of work: a single GET against `url`.
///
/// Implementations never fail: transport errors are folded into the returned
/// [`Outcome`].
#[async_trait]
pub trait RequestIssuer: Send + Sync {
    async fn issue(&self, url: &str) -> Outcome;
}

/// Telemetry sink fed by the outcome recorder and the pool manager.
///
/// Recording calls may fail (e.g. label lookup); gauges cannot.
pub trait MetricsSink: Send + Sync {
    fn inc_requests(&self) -> Result<(), MetricsError>;
    fn inc_status(&self, code: &str) -> Result<(), MetricsError>;
    fn observe_duration(&self, seconds: f64) -> Result<(), MetricsError>;
    fn inc_running_workers(&self);
    fn dec_running_workers(&self);
    fn set_target_rate(&self, rate: u32);
}
