//! Prometheus metrics for the load generator
//!
//! Metric names are kept stable for existing dashboards and carry no prefix.

use crate::domain::errors::MetricsError;
use crate::domain::ports::MetricsSink;
use crate::infrastructure::observability::rolling_summary::RollingSummary;
use prometheus::{Counter, CounterVec, Gauge, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Duration;

/// Quantiles reported for request durations
pub const DURATION_OBJECTIVES: [f64; 3] = [0.5, 0.9, 0.99];
const DURATION_MAX_AGE: Duration = Duration::from_secs(15);
const DURATION_AGE_BUCKETS: u32 = 15;

/// Prometheus metrics for the engine
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Total requests issued
    pub requests_total: Counter,
    /// Requests by HTTP status code ("0" when no response was obtained)
    pub requests_by_code: CounterVec,
    /// Live worker count
    pub running_clients: Gauge,
    /// Configured aggregate dispatch rate
    pub target_rate: Gauge,
    /// Request duration in seconds
    pub request_duration: RollingSummary,
}

impl Metrics {
    /// Create a new Metrics instance with all collectors registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let requests_total = Counter::with_opts(Opts::new(
            "requestCounter",
            "Total number of requests issued",
        ))?;
        registry.register(Box::new(requests_total.clone()))?;

        let requests_by_code = CounterVec::new(
            Opts::new("http_requests_total", "Requests by HTTP status code"),
            &["code"],
        )?;
        registry.register(Box::new(requests_by_code.clone()))?;

        let running_clients = Gauge::with_opts(Opts::new(
            "runningClients",
            "Number of running load workers",
        ))?;
        registry.register(Box::new(running_clients.clone()))?;

        let target_rate = Gauge::with_opts(Opts::new(
            "requestsPerSecondTarget",
            "Configured target requests per second",
        ))?;
        registry.register(Box::new(target_rate.clone()))?;

        let request_duration = RollingSummary::new(
            "requestDuration",
            "Request duration in seconds",
            &DURATION_OBJECTIVES,
            DURATION_MAX_AGE,
            DURATION_AGE_BUCKETS,
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            requests_by_code,
            running_clients,
            target_rate,
            request_duration,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        Ok(encoder.encode_to_string(&metric_families)?)
    }
}

impl MetricsSink for Metrics {
    fn inc_requests(&self) -> Result<(), MetricsError> {
        self.requests_total.inc();
        Ok(())
    }

    fn inc_status(&self, code: &str) -> Result<(), MetricsError> {
        self.requests_by_code.get_metric_with_label_values(&[code])?.inc();
        Ok(())
    }

    fn observe_duration(&self, seconds: f64) -> Result<(), MetricsError> {
        self.request_duration.observe(seconds)
    }

    fn inc_running_workers(&self) {
        self.running_clients.inc();
    }

    fn dec_running_workers(&self) {
        self.running_clients.dec();
    }

    fn set_target_rate(&self, rate: u32) {
        self.target_rate.set(rate as f64);
    }
}
