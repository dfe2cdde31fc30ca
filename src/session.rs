//! Per-session state shared by the refresh worker and the event path

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use thiserror::Error;
use tracing::debug;

use crate::channels::{ChannelIndex, ChannelStore};
use crate::display::DisplaySink;
use crate::fetch::{FetchFailure, FetchResult};
use crate::observability::Metrics;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("display surface already released")]
    DisplayReleased,
}

/// What happened to a cycle's outcome at the display boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    Shown,
    /// The user switched channel while the fetch was in flight
    Stale,
}

/// One application session: channel selection, the stale-result flag and
/// the display surface.
///
/// The display slot's lock also serialises "check stale flag then render"
/// against "switch channel then reset", so a stale image can never land
/// after the placeholder for the new channel.
pub struct Session {
    store: ChannelStore,
    channel: AtomicU8,
    channel_changed: AtomicBool,
    display: Mutex<Option<Arc<dyn DisplaySink>>>,
    metrics: Arc<Metrics>,
}

impl Session {
    pub fn new(store: ChannelStore, display: Arc<dyn DisplaySink>, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            channel: AtomicU8::new(ChannelIndex::FIRST.get()),
            channel_changed: AtomicBool::new(false),
            display: Mutex::new(Some(display)),
            metrics,
        }
    }

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn current_channel(&self) -> ChannelIndex {
        // Only ever stored from a valid ChannelIndex
        ChannelIndex::new(self.channel.load(Ordering::SeqCst)).unwrap_or(ChannelIndex::FIRST)
    }

    pub fn channel_changed(&self) -> bool {
        self.channel_changed.load(Ordering::SeqCst)
    }

    /// Start of a Loading cycle: clear the stale marker, then capture the channel
    pub fn begin_cycle(&self) -> ChannelIndex {
        self.channel_changed.store(false, Ordering::SeqCst);
        self.current_channel()
    }

    /// Make `channel` active and give instant feedback on the display
    pub fn switch_channel(&self, channel: ChannelIndex) {
        let display = self.display.lock();
        self.channel.store(channel.get(), Ordering::SeqCst);
        self.channel_changed.store(true, Ordering::SeqCst);

        if let Some(display) = display.as_ref() {
            display.set_status_text(&loading_message(channel));
            display.reset_to_default();
        }
    }

    /// Placeholder plus "Loading webcam N..." for the current channel
    pub fn announce_loading(&self) -> Result<(), SessionError> {
        let display = self.display.lock();
        let display = display.as_ref().ok_or(SessionError::DisplayReleased)?;
        display.set_status_text(&loading_message(self.current_channel()));
        display.reset_to_default();
        Ok(())
    }

    /// Apply a cycle's outcome unless the channel changed since `begin_cycle`.
    ///
    /// On failure the previous image stays on screen, except for
    /// `Unconfigured` which shows the placeholder.
    pub fn present(&self, outcome: &FetchResult) -> Result<Presented, SessionError> {
        let display = self.display.lock();
        let display = display.as_ref().ok_or(SessionError::DisplayReleased)?;

        if self.channel_changed.swap(false, Ordering::SeqCst) {
            debug!("Discarding result for a channel the user has left");
            return Ok(Presented::Stale);
        }

        match outcome {
            FetchResult::Success(bytes) => {
                display.set_status_text("");
                display.set_background_image(bytes.clone());
            }
            FetchResult::Failure(failure @ FetchFailure::Unconfigured { .. }) => {
                display.reset_to_default();
                display.set_status_text(&failure.to_string());
            }
            FetchResult::Failure(failure) => {
                display.set_status_text(&failure.to_string());
            }
        }

        Ok(Presented::Shown)
    }

    /// Detach the display; later rendering attempts fail with `DisplayReleased`
    pub fn release_display(&self) -> Option<Arc<dyn DisplaySink>> {
        self.display.lock().take()
    }

    pub fn has_display(&self) -> bool {
        self.display.lock().is_some()
    }
}

pub fn loading_message(channel: ChannelIndex) -> String {
    format!("Loading webcam {}...", channel.number())
}
