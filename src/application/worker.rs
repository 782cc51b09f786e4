use crate::application::config_store::ConfigStore;
use crate::application::dispatch::TokenReceiver;
use crate::application::outcome_recorder::OutcomeRecorder;
use crate::domain::ports::RequestIssuer;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

pub type WorkerId = u64;

/// Everything a worker needs, shared by all workers of a pool.
#[derive(Clone)]
pub struct WorkerContext {
    pub config: ConfigStore,
    pub tokens: TokenReceiver,
    pub issuer: Arc<dyn RequestIssuer>,
    pub recorder: OutcomeRecorder,
}

/// Pool-side handle of a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    pub id: WorkerId,
    stop: CancellationToken,
}

impl WorkerHandle {
    pub fn new(id: WorkerId, stop: CancellationToken) -> Self {
        Self { id, stop }
    }

    /// One-shot, non-blocking stop request.
    pub fn stop(&self) {
        self.stop.cancel();
    }
}

/// Worker main loop.
///
/// Waits for either a dispatch token or its stop signal. Each token turns into
/// one request against the URL configured at that moment. On exit the worker
/// id is reported on `stopped`.
pub async fn run_worker(
    id: WorkerId,
    ctx: WorkerContext,
    stop: CancellationToken,
    stopped: mpsc::UnboundedSender<WorkerId>,
) {
    debug!(worker_id = id, "Worker started");

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            token = ctx.tokens.recv() => {
                let Some(token) = token else {
                    debug!(worker_id = id, "Dispatch channel closed");
                    break;
                };
                let url = ctx.config.url();
                trace!(worker_id = id, token = %token, url = %url, "Issuing request");
                let outcome = ctx.issuer.issue(&url).await;
                ctx.recorder.record(id, &outcome);
            }
        }
    }

    debug!(worker_id = id, "Worker stopped");
    // The pool may already be gone during shutdown
    let _ = stopped.send(id);
}
