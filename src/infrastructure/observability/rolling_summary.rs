//! Summary metric with quantiles over a sliding time window.
//!
//! The `prometheus` crate has no summary type, so this collector keeps its own
//! ring of age buckets, each an HDR histogram with microsecond resolution.
//! Quantiles are computed over the merged buckets still inside the window;
//! sample count and sum are cumulative over the process lifetime.

use crate::domain::errors::MetricsError;
use hdrhistogram::Histogram;
use prometheus::core::{Collector, Desc};
use prometheus::proto::{Metric, MetricFamily, MetricType, Quantile, Summary};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// One hour, in microseconds
const HIGHEST_TRACKABLE_MICROS: u64 = 3_600_000_000;
const SIGNIFICANT_FIGURES: u8 = 3;

struct AgeBucket {
    epoch: u64,
    histogram: Histogram<u64>,
}

struct Window {
    origin: Instant,
    bucket_width: Duration,
    buckets: Vec<AgeBucket>,
    count: u64,
    sum: f64,
}

impl Window {
    fn current_epoch(&self) -> u64 {
        (self.origin.elapsed().as_nanos() / self.bucket_width.as_nanos().max(1)) as u64
    }

    fn is_live(&self, bucket: &AgeBucket, now: u64) -> bool {
        bucket.epoch + self.buckets.len() as u64 > now
    }
}

#[derive(Clone)]
pub struct RollingSummary {
    desc: Desc,
    objectives: Vec<f64>,
    window: Arc<Mutex<Window>>,
}

impl RollingSummary {
    pub fn new(
        name: &str,
        help: &str,
        objectives: &[f64],
        max_age: Duration,
        age_buckets: u32,
    ) -> Result<Self, MetricsError> {
        let desc = Desc::new(name.to_string(), help.to_string(), vec![], HashMap::new())?;

        let age_buckets = age_buckets.max(1);
        let mut buckets = Vec::with_capacity(age_buckets as usize);
        for _ in 0..age_buckets {
            let histogram = Histogram::new_with_max(HIGHEST_TRACKABLE_MICROS, SIGNIFICANT_FIGURES)
                .map_err(|e| MetricsError::Histogram {
                    reason: e.to_string(),
                })?;
            buckets.push(AgeBucket {
                epoch: 0,
                histogram,
            });
        }

        Ok(Self {
            desc,
            objectives: objectives.to_vec(),
            window: Arc::new(Mutex::new(Window {
                origin: Instant::now(),
                bucket_width: max_age / age_buckets,
                buckets,
                count: 0,
                sum: 0.0,
            })),
        })
    }

    pub fn observe(&self, seconds: f64) -> Result<(), MetricsError> {
        let micros = (seconds * 1e6).round().max(0.0) as u64;
        let mut window = self.window.lock().unwrap_or_else(|p| p.into_inner());

        let now = window.current_epoch();
        let len = window.buckets.len() as u64;
        let bucket = &mut window.buckets[(now % len) as usize];
        if bucket.epoch != now {
            bucket.histogram.reset();
            bucket.epoch = now;
        }
        bucket
            .histogram
            .record(micros.min(HIGHEST_TRACKABLE_MICROS))
            .map_err(|e| MetricsError::Histogram {
                reason: e.to_string(),
            })?;

        window.count += 1;
        window.sum += seconds;
        Ok(())
    }

    /// `(objective, value in seconds)` pairs over the live window.
    /// Values are NaN while the window holds no samples.
    pub fn quantiles(&self) -> Vec<(f64, f64)> {
        let window = self.window.lock().unwrap_or_else(|p| p.into_inner());
        let now = window.current_epoch();

        let mut merged: Option<Histogram<u64>> = None;
        for bucket in window.buckets.iter().filter(|b| window.is_live(b, now)) {
            match merged.as_mut() {
                Some(m) => {
                    // Same bounds on every bucket, so addition cannot overflow the range
                    if let Err(e) = m.add(&bucket.histogram) {
                        debug!("RollingSummary: failed to merge age bucket: {}", e);
                    }
                }
                None => merged = Some(bucket.histogram.clone()),
            }
        }

        self.objectives
            .iter()
            .map(|&q| {
                let value = match &merged {
                    Some(h) if !h.is_empty() => h.value_at_quantile(q) as f64 / 1e6,
                    _ => f64::NAN,
                };
                (q, value)
            })
            .collect()
    }

    pub fn sample_count(&self) -> u64 {
        self.window.lock().unwrap_or_else(|p| p.into_inner()).count
    }

    pub fn sample_sum(&self) -> f64 {
        self.window.lock().unwrap_or_else(|p| p.into_inner()).sum
    }
}

impl Collector for RollingSummary {
    fn desc(&self) -> Vec<&Desc> {
        vec![&self.desc]
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let quantiles = self
            .quantiles()
            .into_iter()
            .map(|(objective, value)| {
                let mut q = Quantile::default();
                q.set_quantile(objective);
                q.set_value(value);
                q
            })
            .collect();

        let mut summary = Summary::default();
        summary.set_sample_count(self.sample_count());
        summary.set_sample_sum(self.sample_sum());
        summary.set_quantile(quantiles);

        let mut metric = Metric::default();
        metric.set_summary(summary);

        let mut family = MetricFamily::default();
        family.set_name(self.desc.fq_name.clone());
        family.set_help(self.desc.help.clone());
        family.set_field_type(MetricType::SUMMARY);
        family.set_metric(vec![metric]);
        vec![family]
    }
}
