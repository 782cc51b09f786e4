use crate::application::config_store::ConfigStore;
use crate::application::settings::EngineSettings;
use crate::application::worker::{WorkerContext, WorkerHandle, WorkerId, run_worker};
use crate::domain::ports::MetricsSink;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Number of workers the pool currently considers live.
#[derive(Debug, Clone, Default)]
pub struct LiveWorkers(Arc<AtomicUsize>);

impl LiveWorkers {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn set(&self, n: usize) {
        self.0.store(n, Ordering::SeqCst);
    }
}

/// What a single reconciliation step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStep {
    Started(WorkerId),
    Stopped(WorkerId),
    /// Pool matched the desired size; `drained` stop acknowledgements were consumed.
    Steady { drained: usize },
}

/// Keeps the number of live workers equal to the configured client count.
///
/// Level-triggered: every step compares the desired size against the live
/// set and corrects by at most one worker. Ramp-up adds one worker per tick;
/// ramp-down repeats immediately until the pool is small enough.
pub struct PoolManager {
    config: ConfigStore,
    ctx: WorkerContext,
    sink: Arc<dyn MetricsSink>,
    settings: EngineSettings,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    live: Vec<WorkerHandle>,
    live_count: LiveWorkers,
    next_id: WorkerId,
    stopped_tx: mpsc::UnboundedSender<WorkerId>,
    stopped_rx: mpsc::UnboundedReceiver<WorkerId>,
}

impl PoolManager {
    pub fn new(
        ctx: WorkerContext,
        sink: Arc<dyn MetricsSink>,
        settings: EngineSettings,
        shutdown: CancellationToken,
        tracker: TaskTracker,
    ) -> Self {
        let (stopped_tx, stopped_rx) = mpsc::unbounded_channel();
        Self {
            config: ctx.config.clone(),
            ctx,
            sink,
            settings,
            shutdown,
            tracker,
            live: Vec::new(),
            live_count: LiveWorkers::default(),
            next_id: 0,
            stopped_tx,
            stopped_rx,
        }
    }

    pub fn live_workers(&self) -> LiveWorkers {
        self.live_count.clone()
    }

    /// Performs one reconciliation step without waiting.
    pub fn reconcile_once(&mut self) -> ReconcileStep {
        let desired = self.config.desired_workers();
        let live = self.live.len();

        let step = if live < desired {
            ReconcileStep::Started(self.start_worker())
        } else if live > desired {
            match self.live.pop() {
                Some(handle) => {
                    handle.stop();
                    self.sink.dec_running_workers();
                    debug!(worker_id = handle.id, "Stop requested");
                    ReconcileStep::Stopped(handle.id)
                }
                None => ReconcileStep::Steady { drained: 0 },
            }
        } else {
            ReconcileStep::Steady {
                drained: self.drain_stopped(),
            }
        };

        self.live_count.set(self.live.len());
        step
    }

    fn start_worker(&mut self) -> WorkerId {
        let id = self.next_id;
        self.next_id += 1;

        let stop = self.shutdown.child_token();
        self.tracker.spawn(run_worker(
            id,
            self.ctx.clone(),
            stop.clone(),
            self.stopped_tx.clone(),
        ));
        self.live.push(WorkerHandle::new(id, stop));
        self.sink.inc_running_workers();
        debug!(worker_id = id, "Worker spawned");
        id
    }

    fn drain_stopped(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(id) = self.stopped_rx.try_recv() {
            debug!(worker_id = id, "Worker stop acknowledged");
            drained += 1;
        }
        drained
    }

    /// Reconciles until shutdown, then stops every remaining worker.
    pub async fn run(mut self) {
        info!(
            "PoolManager: starting (reconcile every {:?})",
            self.settings.reconcile_interval
        );
        let mut changes = self.config.subscribe();

        while !self.shutdown.is_cancelled() {
            if let ReconcileStep::Stopped(_) = self.reconcile_once() {
                continue;
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.settings.reconcile_interval) => {}
                Ok(()) = changes.changed() => {
                    debug!("PoolManager: configuration changed");
                }
            }
        }

        let remaining = self.live.len();
        for handle in self.live.drain(..) {
            handle.stop();
            self.sink.dec_running_workers();
        }
        self.live_count.set(0);
        info!("PoolManager: stopped ({} workers signalled)", remaining);
    }
}
