//! In-memory [`GameRepository`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use rookery_chess::Color;
use rookery_protocol::{GameId, Username};
use tokio::sync::RwLock;

use crate::{GameRecord, GameRepository, StoreError};

/// Games kept in a map behind an async lock. IDs start at 1.
#[derive(Debug)]
pub struct MemoryGameRepository {
    games: RwLock<BTreeMap<GameId, GameRecord>>,
    next_id: AtomicU32,
}

impl Default for MemoryGameRepository {
    fn default() -> Self {
        Self {
            games: RwLock::new(BTreeMap::new()),
            next_id: AtomicU32::new(1),
        }
    }
}

impl MemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a game with both seats open and returns its ID.
    pub async fn create_game(&self, game_name: impl Into<String>) -> GameId {
        let game_id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = GameRecord::new(game_id, game_name);
        tracing::info!(%game_id, game_name = %record.game_name, "game created");
        self.games.write().await.insert(game_id, record);
        game_id
    }

    /// Assigns `color`'s seat to `username`.
    ///
    /// Claiming a seat you already hold succeeds. This is the lobby step
    /// that must happen before a `JOIN_PLAYER` will be accepted.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if the game does not exist
    /// - [`StoreError::SeatTaken`] if someone else holds the seat
    pub async fn claim_seat(
        &self,
        game_id: GameId,
        color: Color,
        username: Username,
    ) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        let record = games.get_mut(&game_id).ok_or(StoreError::NotFound(game_id))?;

        match record.username_for(color) {
            Some(holder) if *holder != username => Err(StoreError::SeatTaken { game_id, color }),
            _ => {
                tracing::debug!(%game_id, %color, %username, "seat claimed");
                record.set_seat(color, Some(username));
                Ok(())
            }
        }
    }

    /// All games, ordered by ID.
    pub async fn list_games(&self) -> Vec<GameRecord> {
        self.games.read().await.values().cloned().collect()
    }
}

impl GameRepository for MemoryGameRepository {
    async fn get_game(&self, game_id: GameId) -> Result<GameRecord, StoreError> {
        self.games
            .read()
            .await
            .get(&game_id)
            .cloned()
            .ok_or(StoreError::NotFound(game_id))
    }

    async fn update_game(&self, record: GameRecord) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        let slot = games
            .get_mut(&record.game_id)
            .ok_or(StoreError::NotFound(record.game_id))?;
        *slot = record;
        Ok(())
    }
}
