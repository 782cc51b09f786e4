//! Observability for the load generator
//!
//! Metrics are pulled: the control surface exposes the registry on `/metrics`
//! in Prometheus text format.

pub mod metrics;
pub mod rolling_summary;

pub use metrics::Metrics;
pub use rolling_summary::RollingSummary;
