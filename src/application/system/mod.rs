use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::application::config_store::ConfigStore;
use crate::application::dispatch::dispatch_channel;
use crate::application::metronome::Metronome;
use crate::application::outcome_recorder::OutcomeRecorder;
use crate::application::pool_manager::{LiveWorkers, PoolManager};
use crate::application::settings::EngineSettings;
use crate::application::throughput::ThroughputMeter;
use crate::application::worker::WorkerContext;
use crate::config::ServerConfig;
use crate::domain::LoadConfig;
use crate::domain::ports::{MetricsSink, RequestIssuer};
use crate::infrastructure::http_client_factory::HttpClientFactory;
use crate::infrastructure::observability::Metrics;
use crate::infrastructure::request_issuer::HttpRequestIssuer;

/// Handle to a running engine.
pub struct SystemHandle {
    pub config: ConfigStore,
    pub metrics: Metrics,
    pub throughput: ThroughputMeter,
    pub live_workers: LiveWorkers,
    shutdown: CancellationToken,
    workers: TaskTracker,
    pool_task: JoinHandle<()>,
    metronome_task: JoinHandle<()>,
}

impl SystemHandle {
    /// Token cancelled when the engine shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stops the metronome, the pool manager and every worker, then waits for
    /// them. In-flight requests are allowed to complete.
    pub async fn shutdown(self) {
        info!("Initiating Graceful Shutdown Sequence...");
        self.shutdown.cancel();

        info!("Step 1: Stopping metronome...");
        if let Err(e) = self.metronome_task.await {
            warn!("Metronome task ended abnormally: {}", e);
        }

        info!("Step 2: Stopping pool manager...");
        if let Err(e) = self.pool_task.await {
            warn!("Pool manager task ended abnormally: {}", e);
        }

        info!("Step 3: Waiting for {} worker tasks...", self.workers.len());
        self.workers.close();
        self.workers.wait().await;

        info!("Graceful Shutdown Complete. Goodbye!");
    }
}

/// Wires the engine together.
pub struct Application {
    pub config: ConfigStore,
    pub metrics: Metrics,
    issuer: Arc<dyn RequestIssuer>,
    settings: EngineSettings,
}

impl Application {
    pub fn build(config: &ServerConfig) -> Result<Self> {
        info!(
            "Building load generator (target: {}, clients: {}, rate: {}/s)",
            config.initial.url, config.initial.clients, config.initial.requests_per_second_target
        );

        let metrics = Metrics::new().context("Failed to register metrics")?;
        let client =
            HttpClientFactory::create_client(config.request_timeout, config.max_idle_per_host)
                .context("Failed to build HTTP client")?;
        let issuer: Arc<dyn RequestIssuer> = Arc::new(HttpRequestIssuer::new(client));

        Ok(Self::with_parts(
            config.initial.clone(),
            metrics,
            issuer,
            config.engine,
        ))
    }

    /// Assembles an application from already-built parts.
    pub fn with_parts(
        initial: LoadConfig,
        metrics: Metrics,
        issuer: Arc<dyn RequestIssuer>,
        settings: EngineSettings,
    ) -> Self {
        metrics.set_target_rate(initial.requests_per_second_target);
        Self {
            config: ConfigStore::new(initial),
            metrics,
            issuer,
            settings,
        }
    }

    /// Spawns the pool manager and the metronome. Workers follow as the pool
    /// reconciles.
    pub fn start(self) -> SystemHandle {
        info!("Starting engine...");
        let shutdown = CancellationToken::new();
        let workers = TaskTracker::new();
        let throughput = ThroughputMeter::new(self.settings.rate_window);
        let sink: Arc<dyn MetricsSink> = Arc::new(self.metrics.clone());

        let (tokens_tx, tokens_rx) = dispatch_channel();
        let ctx = WorkerContext {
            config: self.config.clone(),
            tokens: tokens_rx,
            issuer: self.issuer,
            recorder: OutcomeRecorder::new(sink.clone()),
        };

        let pool = PoolManager::new(
            ctx,
            sink,
            self.settings,
            shutdown.clone(),
            workers.clone(),
        );
        let live_workers = pool.live_workers();
        let pool_task = tokio::spawn(pool.run());

        let metronome = Metronome::new(
            self.config.clone(),
            tokens_tx,
            throughput.clone(),
            self.settings,
            shutdown.clone(),
        );
        let metronome_task = tokio::spawn(metronome.run());

        SystemHandle {
            config: self.config,
            metrics: self.metrics,
            throughput,
            live_workers,
            shutdown,
            workers,
            pool_task,
            metronome_task,
        }
    }
}
