//! Error types for the store layer.

use rookery_chess::Color;
use rookery_protocol::GameId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameId),

    /// Someone else already holds that seat.
    #[error("{color} seat in game {game_id} is already taken")]
    SeatTaken { game_id: GameId, color: Color },

    /// The backend could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
