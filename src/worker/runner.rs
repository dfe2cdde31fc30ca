//! Refresh worker loop: Loading -> (Displaying | Erroring) -> Loading ...

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::Cadence;
use crate::channels::is_fetchable;
use crate::fetch::{Connectivity, FetchFailure, FetchResult, ImageFetcher};
use crate::observability::Metrics;
use crate::session::{Presented, Session, SessionError};
use crate::target::parse_target;

/// Faults that end the worker. Fetch failures are not errors; they are
/// reported on the display and the loop continues.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("session fault: {0}")]
    Session(#[from] SessionError),
}

pub type Result<T> = std::result::Result<T, WorkerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    Idle,
    Loading,
    Displaying,
    Erroring,
    Stopping,
    Stopped,
}

/// Keeps the active-worker gauge honest even if the loop panics
struct ActiveWorker(Arc<Metrics>);

impl ActiveWorker {
    fn enter(metrics: &Arc<Metrics>) -> Self {
        metrics.worker_started();
        Self(metrics.clone())
    }
}

impl Drop for ActiveWorker {
    fn drop(&mut self) {
        self.0.worker_stopped();
    }
}

pub struct RefreshWorker {
    id: Uuid,
    session: Arc<Session>,
    fetcher: ImageFetcher,
    connectivity: Arc<dyn Connectivity>,
    cadence: Cadence,
    cancel: CancellationToken,
    phase: WorkerPhase,
}

impl RefreshWorker {
    pub fn new(
        session: Arc<Session>,
        fetcher: ImageFetcher,
        connectivity: Arc<dyn Connectivity>,
        cadence: Cadence,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session,
            fetcher,
            connectivity,
            cadence,
            cancel,
            phase: WorkerPhase::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run until cancelled, holding the worker slot for the whole run.
    ///
    /// The slot is released only after the loop has exited, which is what
    /// the supervisor waits on before starting a replacement.
    pub async fn run(mut self, slot: OwnedMutexGuard<()>) -> Result<()> {
        let active = ActiveWorker::enter(self.session.metrics());
        info!(worker_id = %self.id, "Refresh worker started");

        let result = self.refresh_loop().await;
        match &result {
            Ok(()) => info!(worker_id = %self.id, "Refresh worker stopped"),
            Err(e) => error!(worker_id = %self.id, error = %e, "Refresh worker crashed"),
        }
        self.transition(WorkerPhase::Stopped);

        drop(active);
        drop(slot);
        result
    }

    async fn refresh_loop(&mut self) -> Result<()> {
        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.transition(WorkerPhase::Loading);
            let channel = self.session.begin_cycle();
            let url = self.session.store().url_for(channel);

            let outcome = if is_fetchable(&url) {
                let target = parse_target(&url);
                debug!(worker_id = %self.id, %channel, url = %target.fetch_url, "Fetching");
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    result = self.fetcher.fetch(&target, self.connectivity.as_ref()) => result,
                }
            } else {
                FetchResult::Failure(FetchFailure::Unconfigured { channel })
            };

            if self.session.present(&outcome)? == Presented::Stale {
                self.session.metrics().stale_discarded();
                continue;
            }

            let delay = match &outcome {
                FetchResult::Success(bytes) => {
                    self.session.metrics().fetch_succeeded();
                    self.transition(WorkerPhase::Displaying);
                    debug!(worker_id = %self.id, %channel, size = bytes.len(), "Background updated");
                    self.cadence.success_delay
                }
                FetchResult::Failure(reason) => {
                    self.session.metrics().fetch_failed();
                    self.transition(WorkerPhase::Erroring);
                    debug!(worker_id = %self.id, %channel, %reason, "Cycle failed");
                    self.cadence.error_delay
                }
            };

            // cadence checkpoint
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.transition(WorkerPhase::Stopping);
        Ok(())
    }

    fn transition(&mut self, next: WorkerPhase) {
        if self.phase != next {
            tracing::trace!(worker_id = %self.id, from = ?self.phase, to = ?next, "Worker phase");
            self.phase = next;
        }
    }
}
