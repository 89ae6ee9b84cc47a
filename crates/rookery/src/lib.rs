//! # Rookery
//!
//! A live chess server. Two seated players and any number of observers
//! share one game over WebSocket; every move is validated against full
//! chess rules, persisted, and pushed to everyone watching.
//!
//! The layers are separate crates, re-exported here:
//!
//! - [`rookery_chess`]: board, move generation, legality, game state
//! - [`rookery_protocol`]: JSON commands and server messages
//! - [`rookery_transport`]: WebSocket connections
//! - [`rookery_session`]: token authentication and per-game connection registries
//! - [`rookery_store`]: the game repository
//! - [`rookery_room`]: one actor per game, executing commands in order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rookery::prelude::*;
//!
//! # async fn run() -> Result<(), RookeryError> {
//! let repository = Arc::new(MemoryGameRepository::new());
//! let game_id = repository.create_game("friendly").await;
//! repository.claim_seat(game_id, Color::White, "alice".into()).await?;
//!
//! let auth = MemoryAuthenticator::new();
//! let token = auth.issue("alice").await;
//! println!("alice signs in with {token}");
//!
//! let server = RookeryServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(auth, repository)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::RookeryError;
pub use server::{RookeryServer, RookeryServerBuilder};

pub use rookery_chess;
pub use rookery_protocol;
pub use rookery_room;
pub use rookery_session;
pub use rookery_store;
pub use rookery_transport;

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::{RookeryError, RookeryServer, RookeryServerBuilder};

    pub use rookery_chess::{Color, GameState, GameStatus, Move, PieceType, Position};
    pub use rookery_protocol::{ClientCommand, Codec, GameId, JsonCodec, ServerMessage, Username};
    pub use rookery_room::{CommandError, RoomConfig};
    pub use rookery_session::{Authenticator, MemoryAuthenticator, SessionError};
    pub use rookery_store::{GameRecord, GameRepository, MemoryGameRepository, StoreError};
}
