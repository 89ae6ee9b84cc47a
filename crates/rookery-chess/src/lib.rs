//! Chess rules engine for Rookery.
//!
//! This crate knows nothing about networking. It owns:
//!
//! - **Board model** ([`Board`], [`Piece`], [`Position`], [`Move`]): an
//!   8×8 grid addressed by 1-based `(row, col)`, row 1 being white's home.
//! - **Move generation** ([`movegen`]): pseudo-legal moves per piece.
//! - **Legality** ([`rules`], [`GameState::valid_moves`]): simulate a move
//!   on a copy of the board and reject it if the mover's king is attacked.
//! - **Game state** ([`GameState`]): turn order, castling, en passant,
//!   promotion, and the checkmate/stalemate/resign terminal states.
//!
//! ```text
//! Board ──movegen──→ pseudo-legal moves ──rules──→ legal moves ──GameState──→ next state
//! ```

mod board;
mod error;
mod game;
pub mod movegen;
pub mod rules;
mod types;

pub use board::Board;
pub use error::{ChessError, PositionError};
pub use game::{CastleSide, CastlingRights, GameState, GameStatus, SideCastling};
pub use movegen::pseudo_legal_moves;
pub use rules::{is_attacked, is_in_check};
pub use types::{Color, Move, Piece, PieceType, Position};
