use crate::domain::LoadConfig;
use std::sync::Arc;
use tokio::sync::watch;

/// Process-wide configuration cell.
///
/// Backed by a `watch` channel: writers swap the whole [`LoadConfig`] and
/// readers always clone one complete value, so a read can never observe a mix
/// of two updates. Subscribers are woken on every replacement.
#[derive(Clone)]
pub struct ConfigStore {
    tx: Arc<watch::Sender<LoadConfig>>,
}

impl ConfigStore {
    pub fn new(initial: LoadConfig) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current configuration.
    pub fn get(&self) -> LoadConfig {
        self.tx.borrow().clone()
    }

    /// Replace the configuration wholesale, returning the previous value.
    pub fn replace(&self, config: LoadConfig) -> LoadConfig {
        self.tx.send_replace(config)
    }

    /// Like [`replace`](Self::replace), but runs `on_swap` on the new value
    /// while writers are still excluded, so state derived from the
    /// configuration is updated in the same order as the configuration.
    pub fn replace_with(
        &self,
        config: LoadConfig,
        on_swap: impl FnOnce(&LoadConfig),
    ) -> LoadConfig {
        let mut previous = None;
        self.tx.send_modify(|current| {
            previous = Some(std::mem::replace(current, config));
            on_swap(current);
        });
        previous.unwrap_or_default()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadConfig> {
        self.tx.subscribe()
    }

    pub fn url(&self) -> String {
        self.tx.borrow().url.clone()
    }

    pub fn desired_workers(&self) -> usize {
        self.tx.borrow().desired_workers()
    }

    pub fn target_rate(&self) -> u32 {
        self.tx.borrow().requests_per_second_target
    }
}
