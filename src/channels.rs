//! Channel indices and URL resolution against the external config source

use std::fmt;
use std::sync::Arc;

use crate::config::{ConfigSource, UNKNOWN_URL};

/// Number of configurable channels
pub const CHANNEL_COUNT: u8 = 5;

/// One of the five channel slots, always in `0..CHANNEL_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ChannelIndex(u8);

impl ChannelIndex {
    /// Fallback slot, selectable even when unconfigured
    pub const FIRST: ChannelIndex = ChannelIndex(0);

    pub fn new(index: u8) -> Option<Self> {
        (index < CHANNEL_COUNT).then_some(Self(index))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// 1-based number shown to the user ("webcam 3")
    pub fn number(self) -> u8 {
        self.0 + 1
    }

    /// Config key holding this channel's URL (`url1`..`url5`)
    pub fn config_key(self) -> String {
        format!("url{}", self.number())
    }

    /// Neighbouring slot, wrapping around at both ends
    pub fn step(self, direction: Direction) -> Self {
        let next = match direction {
            Direction::Next => (self.0 + 1) % CHANNEL_COUNT,
            Direction::Previous => (self.0 + CHANNEL_COUNT - 1) % CHANNEL_COUNT,
        };
        Self(next)
    }

    pub fn all() -> impl Iterator<Item = ChannelIndex> {
        (0..CHANNEL_COUNT).map(ChannelIndex)
    }
}

impl fmt::Display for ChannelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// True when the worker may hand this URL to the fetcher
pub fn is_fetchable(url: &str) -> bool {
    url.starts_with("http")
}

/// Resolves channel URLs from the external configuration, fresh on each call
#[derive(Clone)]
pub struct ChannelStore {
    source: Arc<dyn ConfigSource>,
}

impl ChannelStore {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self { source }
    }

    pub fn url_for(&self, channel: ChannelIndex) -> String {
        self.source.get(&channel.config_key(), UNKNOWN_URL)
    }

    pub fn is_configured(&self, channel: ChannelIndex) -> bool {
        is_fetchable(&self.url_for(channel))
    }
}
