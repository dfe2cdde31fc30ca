//! Host-facing entry points: lifecycle calls and user input

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::channels::{ChannelIndex, ChannelStore, Direction};
use crate::config::ConfigSource;
use crate::display::DisplaySink;
use crate::fetch::{Connectivity, ImageFetcher, Transport};
use crate::input::InputEvent;
use crate::observability::{Metrics, MetricsSnapshot};
use crate::selector::ChannelSelector;
use crate::session::{Session, SessionError};
use crate::worker::{Cadence, SupervisorError, WorkerState, WorkerSupervisor};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

/// Collaborators the host supplies at boot
pub struct Boot {
    pub source: Arc<dyn ConfigSource>,
    pub display: Arc<dyn DisplaySink>,
    pub transport: Arc<dyn Transport>,
    pub connectivity: Arc<dyn Connectivity>,
    pub cadence: Cadence,
}

/// One application session. Lifecycle calls and input must come from a
/// single event-dispatch path; the refresh worker runs beside it.
pub struct App {
    session: Arc<Session>,
    selector: ChannelSelector,
    supervisor: WorkerSupervisor,
}

impl App {
    pub fn on_boot(boot: Boot) -> Self {
        let metrics = Arc::new(Metrics::new());
        let session = Arc::new(Session::new(
            ChannelStore::new(boot.source),
            boot.display,
            metrics,
        ));
        let supervisor = WorkerSupervisor::new(
            session.clone(),
            ImageFetcher::new(boot.transport),
            boot.connectivity,
            boot.cadence,
        );

        info!("Refresh engine booted");
        Self {
            selector: ChannelSelector::new(session.clone()),
            session,
            supervisor,
        }
    }

    /// Show the placeholder and "Loading webcam N..." before the first fetch
    pub fn on_start(&mut self) -> Result<(), AppError> {
        self.session.announce_loading()?;
        Ok(())
    }

    pub async fn on_resume(&mut self) -> Result<(), AppError> {
        self.supervisor.on_resume().await?;
        Ok(())
    }

    pub fn on_pause(&mut self) {
        self.supervisor.on_pause();
    }

    pub async fn on_stop(&mut self) {
        self.supervisor.on_stop().await;
    }

    /// Returns the newly selected channel, or `None` for ignored input
    pub fn on_input(&self, event: InputEvent) -> Option<ChannelIndex> {
        let direction = match event {
            InputEvent::ChannelNext => Direction::Next,
            InputEvent::ChannelPrevious => Direction::Previous,
            InputEvent::Other => {
                debug!(?event, "Ignoring input");
                return None;
            }
        };
        Some(self.selector.advance(direction))
    }

    pub fn current_channel(&self) -> ChannelIndex {
        self.session.current_channel()
    }

    pub fn worker_state(&self) -> WorkerState {
        self.supervisor.state()
    }

    pub fn worker_finished(&self) -> bool {
        self.supervisor.worker_finished()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.session.metrics().snapshot()
    }
}
