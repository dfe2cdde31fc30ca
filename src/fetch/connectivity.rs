use std::sync::atomic::{AtomicBool, Ordering};

/// Network reachability probe consulted before every fetch
pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;
}

impl<F> Connectivity for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_connected(&self) -> bool {
        self()
    }
}

/// For hosts without a network-state API
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConnected;

impl Connectivity for AlwaysConnected {
    fn is_connected(&self) -> bool {
        true
    }
}

/// Flag flipped by the host's network-state callbacks
#[derive(Debug)]
pub struct ConnectivityFlag {
    connected: AtomicBool,
}

impl ConnectivityFlag {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    pub fn set(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
