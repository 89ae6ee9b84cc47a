//! Room manager: maps game IDs to running room actors.

use std::collections::HashMap;
use std::sync::Arc;

use rookery_protocol::GameId;
use rookery_store::GameRepository;

use crate::room::spawn_room;
use crate::{RoomConfig, RoomError, RoomHandle};

/// Tracks one room per game ID.
///
/// Rooms are spawned lazily on the first command for a game and respawned
/// if their task has stopped. The manager itself does no command work, so
/// callers should hold its lock only long enough to clone a handle.
pub struct RoomManager<R: GameRepository> {
    rooms: HashMap<GameId, RoomHandle>,
    repository: Arc<R>,
    config: RoomConfig,
}

impl<R: GameRepository> RoomManager<R> {
    pub fn new(repository: Arc<R>, config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            repository,
            config,
        }
    }

    /// Returns the live room for `game_id`, spawning one if needed.
    pub fn room(&mut self, game_id: GameId) -> RoomHandle {
        if let Some(handle) = self.rooms.get(&game_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }

        let handle = spawn_room(game_id, self.config.clone(), Arc::clone(&self.repository));
        self.rooms.insert(game_id, handle.clone());
        tracing::debug!(%game_id, "room spawned");
        handle
    }

    /// Number of rooms whose task is still running.
    pub fn room_count(&self) -> usize {
        self.rooms.values().filter(|h| !h.is_closed()).count()
    }

    /// Returns the room for `game_id` only if it is still running.
    pub fn live_room(&self, game_id: GameId) -> Option<RoomHandle> {
        self.rooms.get(&game_id).filter(|h| !h.is_closed()).cloned()
    }

    /// Stops the room for `game_id` and forgets it.
    ///
    /// # Errors
    /// [`RoomError::Unavailable`] if no running room exists for that game.
    pub async fn shutdown_room(&mut self, game_id: GameId) -> Result<(), RoomError> {
        let handle = self.rooms.remove(&game_id).ok_or(RoomError::Unavailable(game_id))?;
        handle.shutdown().await?;
        tracing::info!(%game_id, "room shut down");
        Ok(())
    }
}
