use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::Cadence;
use super::runner::{RefreshWorker, WorkerError};
use crate::fetch::{Connectivity, ImageFetcher};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    NotStarted,
    Running,
    /// Cancellation signalled; the worker may still be finishing its cycle
    PauseRequested,
    Stopped,
    /// Worker exited on a fault; the next resume starts a fresh one
    Crashed,
}

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("session already stopped")]
    SessionStopped,
}

/// Owns the single worker slot of a session.
///
/// A worker holds the slot for its entire run. `on_resume` waits for the
/// slot to be free before spawning, so a rapid pause/resume never runs
/// two workers at once even though `on_pause` does not wait.
pub struct WorkerSupervisor {
    session: Arc<Session>,
    fetcher: ImageFetcher,
    connectivity: Arc<dyn Connectivity>,
    cadence: Cadence,
    slot: Arc<Mutex<()>>,
    state: WorkerState,
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<Result<(), WorkerError>>>,
}

impl WorkerSupervisor {
    pub fn new(
        session: Arc<Session>,
        fetcher: ImageFetcher,
        connectivity: Arc<dyn Connectivity>,
        cadence: Cadence,
    ) -> Self {
        Self {
            session,
            fetcher,
            connectivity,
            cadence,
            slot: Arc::new(Mutex::new(())),
            state: WorkerState::NotStarted,
            cancel: None,
            handle: None,
        }
    }

    pub fn state(&self) -> WorkerState {
        match self.state {
            // A running worker only exits on its own after a fault
            WorkerState::Running if !self.worker_finished() => WorkerState::Running,
            WorkerState::Running => WorkerState::Crashed,
            state => state,
        }
    }

    /// True once the last worker has fully left its loop
    pub fn worker_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|handle| handle.is_finished())
    }

    /// Start a worker, first waiting for any previous one to finish stopping
    pub async fn on_resume(&mut self) -> Result<(), SupervisorError> {
        match self.state() {
            WorkerState::Stopped => return Err(SupervisorError::SessionStopped),
            WorkerState::Running => {
                debug!("Refresh worker already running");
                return Ok(());
            }
            _ => {}
        }

        if !self.worker_finished() {
            debug!("Waiting for previous refresh worker to stop");
        }
        let slot = self.slot.clone().lock_owned().await;
        self.reap().await;

        let cancel = CancellationToken::new();
        let worker = RefreshWorker::new(
            self.session.clone(),
            self.fetcher.clone(),
            self.connectivity.clone(),
            self.cadence,
            cancel.clone(),
        );

        info!(
            worker_id = %worker.id(),
            channel = %self.session.current_channel(),
            "Spawning refresh worker"
        );

        self.handle = Some(tokio::spawn(worker.run(slot)));
        self.cancel = Some(cancel);
        self.state = WorkerState::Running;
        Ok(())
    }

    /// Signal the worker to stop at its next checkpoint; does not wait
    pub fn on_pause(&mut self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
        if self.state == WorkerState::Running {
            debug!("Refresh worker cancellation requested");
            self.state = WorkerState::PauseRequested;
        }
    }

    /// Cancel, wait until the worker is fully stopped, then release the display
    pub async fn on_stop(&mut self) {
        if self.state == WorkerState::Stopped {
            return;
        }

        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
        self.reap().await;

        self.session.release_display();
        self.state = WorkerState::Stopped;
        info!("Refresh session stopped");
    }

    /// Collect the previous worker's exit status
    async fn reap(&mut self) {
        self.cancel = None;
        let Some(handle) = self.handle.take() else {
            return;
        };

        match handle.await {
            Ok(Ok(())) => debug!("Previous refresh worker finished"),
            Ok(Err(e)) => {
                error!(error = %e, "Refresh worker exited with a fault");
                self.session.metrics().worker_crashed();
                self.state = WorkerState::Crashed;
            }
            Err(e) => {
                error!(error = %e, "Refresh worker panicked");
                self.session.metrics().worker_crashed();
                self.state = WorkerState::Crashed;
            }
        }
    }
}

impl Drop for WorkerSupervisor {
    fn drop(&mut self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }
}
