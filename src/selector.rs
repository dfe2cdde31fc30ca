//! User-driven channel switching

use std::sync::Arc;
use tracing::info;

use crate::channels::{ChannelIndex, ChannelStore, Direction};
use crate::session::Session;

/// Next selectable channel from `current`, skipping unconfigured slots.
///
/// Channel 1 is always selectable so the walk ends within one lap.
pub fn next_channel(store: &ChannelStore, current: ChannelIndex, direction: Direction) -> ChannelIndex {
    let mut candidate = current.step(direction);
    while candidate != ChannelIndex::FIRST && !store.is_configured(candidate) {
        candidate = candidate.step(direction);
    }
    candidate
}

#[derive(Clone)]
pub struct ChannelSelector {
    session: Arc<Session>,
}

impl ChannelSelector {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Move to the next/previous configured channel. No network I/O happens
    /// here; the running worker picks the new channel up on its next cycle.
    pub fn advance(&self, direction: Direction) -> ChannelIndex {
        let current = self.session.current_channel();
        let next = next_channel(self.session.store(), current, direction);

        info!(from = %current, to = %next, ?direction, "Switching channel");
        self.session.switch_channel(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemorySource;
    use crate::display::MemoryDisplay;
    use crate::observability::Metrics;

    fn store_with(urls: &[(&str, &str)]) -> ChannelStore {
        let source = MemorySource::new();
        for (key, url) in urls {
            source.set(key, *url);
        }
        ChannelStore::new(Arc::new(source))
    }

    fn channel(number: u8) -> ChannelIndex {
        ChannelIndex::new(number - 1).unwrap()
    }

    #[test]
    fn test_skips_unconfigured_channel() {
        let store = store_with(&[
            ("url1", "http://cam/1.jpg"),
            ("url2", "http://cam/2.jpg"),
            ("url3", "Unknown"),
            ("url4", "http://cam/4.jpg"),
            ("url5", "http://cam/5.jpg"),
        ]);

        assert_eq!(next_channel(&store, channel(2), Direction::Next), channel(4));
        assert_eq!(next_channel(&store, channel(4), Direction::Previous), channel(2));
    }

    #[test]
    fn test_round_trip_when_all_configured() {
        let store = store_with(&[
            ("url1", "http://cam/1.jpg"),
            ("url2", "http://cam/2.jpg"),
            ("url3", "https://cam/3.jpg"),
            ("url4", "http://cam/4.jpg"),
            ("url5", "http://cam/5.jpg"),
        ]);

        for start in ChannelIndex::all() {
            let forward = next_channel(&store, start, Direction::Next);
            assert_eq!(forward, start.step(Direction::Next));
            assert_eq!(next_channel(&store, forward, Direction::Previous), start);
        }
    }

    #[test]
    fn test_falls_back_to_first_channel() {
        let store = store_with(&[]);

        assert_eq!(next_channel(&store, channel(1), Direction::Next), channel(1));
        assert_eq!(next_channel(&store, channel(1), Direction::Previous), channel(1));
        assert_eq!(next_channel(&store, channel(3), Direction::Next), channel(1));
    }

    #[test]
    fn test_wraps_past_last_channel() {
        let store = store_with(&[("url2", "http://cam/2.jpg"), ("url5", "http://cam/5.jpg")]);

        assert_eq!(next_channel(&store, channel(5), Direction::Next), channel(1));
        assert_eq!(next_channel(&store, channel(1), Direction::Previous), channel(5));
        assert_eq!(next_channel(&store, channel(2), Direction::Next), channel(5));
    }

    #[test]
    fn test_advance_updates_session_and_display() {
        let store = store_with(&[("url1", "http://cam/1.jpg"), ("url2", "http://cam/2.jpg")]);
        let display = Arc::new(MemoryDisplay::new());
        let session = Arc::new(Session::new(store, display.clone(), Arc::new(Metrics::new())));
        let selector = ChannelSelector::new(session.clone());

        let selected = selector.advance(Direction::Next);

        assert_eq!(selected, channel(2));
        assert_eq!(session.current_channel(), channel(2));
        assert!(session.channel_changed());
        assert_eq!(display.current_status().as_deref(), Some("Loading webcam 2..."));
        assert!(display.current_image().is_none());
    }
}
