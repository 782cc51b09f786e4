use crate::application::config_store::ConfigStore;
use crate::application::dispatch::TokenSender;
use crate::application::settings::EngineSettings;
use crate::application::throughput::ThroughputMeter;
use crate::domain::DispatchToken;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Emits dispatch tokens at the configured aggregate rate.
///
/// The delay before each token is derived from the rate read at that moment,
/// so rate changes apply from the next token on. Emission blocks until a
/// worker takes the token; a saturated pool slows the metronome down.
pub struct Metronome {
    config: ConfigStore,
    tokens: TokenSender,
    meter: ThroughputMeter,
    settings: EngineSettings,
    shutdown: CancellationToken,
    next_seq: u64,
}

impl Metronome {
    pub fn new(
        config: ConfigStore,
        tokens: TokenSender,
        meter: ThroughputMeter,
        settings: EngineSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            tokens,
            meter,
            settings,
            shutdown,
            next_seq: 0,
        }
    }

    pub async fn run(mut self) {
        info!("Metronome: starting");
        let mut changes = self.config.subscribe();

        loop {
            let Some(delay) = self.config.get().inter_token_delay() else {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = tokio::time::sleep(self.settings.idle_poll_interval) => {}
                    Ok(()) = changes.changed() => {}
                }
                continue;
            };

            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }

            let token = DispatchToken::new(self.next_seq);
            self.next_seq += 1;

            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                sent = self.tokens.emit(token) => match sent {
                    Ok(()) => self.meter.record(),
                    Err(e) => {
                        debug!("Metronome: {}", e);
                        break;
                    }
                }
            }
        }

        info!("Metronome: stopped after {} tokens", self.next_seq);
    }
}
