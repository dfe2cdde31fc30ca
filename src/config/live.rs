//! Key/value view of channel configuration consulted by the engine every cycle

use parking_lot::RwLock;
use std::collections::HashMap;

use super::models::ChannelsConfig;

/// Value returned for keys that were never configured
pub const UNKNOWN_URL: &str = "Unknown";

/// Externally owned configuration store (`url1`..`url5`)
///
/// Implementations must be cheap to query: the refresh worker reads the
/// active channel's URL fresh on every cycle so live edits are picked up.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str, default: &str) -> String;
}

impl ConfigSource for ChannelsConfig {
    fn get(&self, key: &str, default: &str) -> String {
        self.get_key(key).unwrap_or(default).to_string()
    }
}

/// In-memory source supporting live edits from a settings form
#[derive(Debug, Default)]
pub struct MemorySource {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_channels(channels: &ChannelsConfig) -> Self {
        let source = Self::new();
        for key in ["url1", "url2", "url3", "url4", "url5"] {
            if let Some(url) = channels.get_key(key) {
                source.set(key, url);
            }
        }
        source
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.values.write().insert(key.to_string(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

impl ConfigSource for MemorySource {
    fn get(&self, key: &str, default: &str) -> String {
        self.values
            .read()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}
