use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    second: u64,
    count: u64,
}

#[derive(Debug)]
struct Window {
    origin: Instant,
    slots: Vec<Slot>,
}

/// Rolling per-second counter of accepted dispatch tokens.
///
/// Counts land in one slot per wall-clock second since creation. The reported
/// rate is the mean over the last completed seconds of the window, so the
/// partially filled current second never drags it down.
#[derive(Debug, Clone)]
pub struct ThroughputMeter {
    inner: Arc<Mutex<Window>>,
}

impl ThroughputMeter {
    pub fn new(window: Duration) -> Self {
        let seconds = window.as_secs().max(1) as usize;
        Self {
            inner: Arc::new(Mutex::new(Window {
                origin: Instant::now(),
                slots: vec![Slot::default(); seconds],
            })),
        }
    }

    pub fn record(&self) {
        let mut window = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let second = window.origin.elapsed().as_secs();
        let len = window.slots.len();
        let slot = &mut window.slots[(second % len as u64) as usize];
        if slot.second != second {
            *slot = Slot { second, count: 0 };
        }
        slot.count += 1;
    }

    /// Tokens per second over the completed part of the window, rounded.
    pub fn per_second(&self) -> u32 {
        let window = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let now = window.origin.elapsed().as_secs();
        let span = (window.slots.len() as u64).min(now);
        if span == 0 {
            return 0;
        }

        let oldest = now - span;
        let total: u64 = window
            .slots
            .iter()
            .filter(|slot| slot.second >= oldest && slot.second < now)
            .map(|slot| slot.count)
            .sum();

        ((total as f64 / span as f64).round()) as u32
    }
}
