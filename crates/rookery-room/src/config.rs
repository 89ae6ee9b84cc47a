//! Room configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by every room a [`RoomManager`](crate::RoomManager)
/// spawns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Capacity of each room's command queue. Submitters wait when it is
    /// full.
    pub command_buffer: usize,

    /// Whether JOIN_OBSERVER is accepted.
    pub allow_observers: bool,

    /// Stop the room's task once no connection is registered. The manager
    /// spawns a fresh one on the next command for that game.
    pub close_when_empty: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            command_buffer: 64,
            allow_observers: true,
            close_when_empty: true,
        }
    }
}
