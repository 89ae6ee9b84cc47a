//! Error types for the room layer.

use rookery_chess::{ChessError, Color};
use rookery_protocol::{GameId, ProtocolError};
use rookery_session::SessionError;
use rookery_store::StoreError;

/// Why a client command was rejected.
///
/// The `Display` text is exactly what the requester receives as
/// `errorMessage`. These are never broadcast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The frame could not be decoded. Logged and dropped; the client gets
    /// no reply.
    #[error("Error: malformed command: {0}")]
    Malformed(String),

    #[error("Error: unauthorized")]
    Unauthorized,

    #[error("Error: game {0} not found")]
    GameNotFound(GameId),

    /// Wrong seat, unclaimed seat, or an observer doing a player's job.
    #[error("Error: {0}")]
    SeatConflict(String),

    /// The move is not legal in the current position.
    #[error("Error: {0}")]
    IllegalMove(ChessError),

    /// The requester holds a seat, but it is the other side's move.
    #[error("Error: it is {0}'s turn")]
    WrongTurn(Color),

    #[error("Error: the game is over")]
    GameOver,

    /// Persistence or identity backend failure. The detail is for logs.
    #[error("Error: internal server error")]
    Internal(String),
}

impl From<ChessError> for CommandError {
    fn from(err: ChessError) -> Self {
        match err {
            ChessError::GameOver => Self::GameOver,
            other => Self::IllegalMove(other),
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(game_id) => Self::GameNotFound(game_id),
            StoreError::SeatTaken { .. } => Self::SeatConflict(err.to_string()),
            StoreError::Unavailable(detail) => Self::Internal(detail),
        }
    }
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthorized => Self::Unauthorized,
            SessionError::AuthFailed(detail) => Self::Internal(detail),
        }
    }
}

impl From<ProtocolError> for CommandError {
    fn from(err: ProtocolError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Errors from talking to a room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room's task has stopped, so its queue is closed.
    #[error("room for game {0} is unavailable")]
    Unavailable(GameId),

    /// The room ran the command and rejected it. The requester has
    /// already been sent the error.
    #[error(transparent)]
    Command(#[from] CommandError),
}
