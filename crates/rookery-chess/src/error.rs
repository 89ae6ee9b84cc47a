//! Error types for the rules engine.

use crate::{Color, Move, Position};

/// Why a move could not be applied to a [`GameState`](crate::GameState).
///
/// Whenever one of these is returned, the game state is exactly as it was
/// before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChessError {
    /// There is no piece on the move's start square.
    #[error("no piece at {0}")]
    NoPiece(Position),

    /// The piece on the start square belongs to the side not on move.
    #[error("it is {expected}'s turn, but the piece is {found}")]
    OutOfTurn { expected: Color, found: Color },

    /// The move is not among the legal moves for its start square.
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    /// The game has already ended (checkmate, stalemate, or resignation).
    #[error("the game is over")]
    GameOver,
}

/// A square that could not be parsed or is off the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("position ({row}, {col}) is off the board")]
    OutOfRange { row: i32, col: i32 },

    #[error("malformed square {0:?}")]
    Malformed(String),
}
