//! Background refresh worker and its lifecycle supervisor
//!
//! One [`RefreshWorker`] task polls the active channel until cancelled.
//! [`WorkerSupervisor`] maps host lifecycle calls onto starting and
//! cancelling that task, guaranteeing at most one runs at a time.

pub mod runner;
pub mod supervisor;

use std::time::Duration;

use crate::config::CadenceConfig;

pub use runner::{RefreshWorker, WorkerError, WorkerPhase};
pub use supervisor::{SupervisorError, WorkerState, WorkerSupervisor};

/// Pauses between cycles; these are the worker's cancellation checkpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub success_delay: Duration,
    pub error_delay: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self::from(&CadenceConfig::default())
    }
}

impl From<&CadenceConfig> for Cadence {
    fn from(config: &CadenceConfig) -> Self {
        Self {
            success_delay: config.success_delay.as_duration(),
            error_delay: config.error_delay.as_duration(),
        }
    }
}
