//! Serializable snapshot of a machine's position.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Point-in-time view of a machine, for debug overlays and logs.
///
/// Does NOT include states or guards (not serializable).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineStatus {
    /// Label of the owning entity
    pub label: String,

    /// Active state, `None` before initialization
    pub current: Option<String>,

    /// State active before the last change
    pub previous: Option<String>,

    /// Time spent in the active state
    pub time_in_state: Duration,

    /// Deferred change waiting for the next update
    pub pending: Option<String>,
}

impl MachineStatus {
    pub fn is_in(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }
}
