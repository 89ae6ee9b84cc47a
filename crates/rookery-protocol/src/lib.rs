//! Wire protocol for Rookery.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Commands** ([`ClientCommand`]): JOIN_PLAYER, JOIN_OBSERVER,
//!   MAKE_MOVE, LEAVE and RESIGN, tagged by `commandType`.
//! - **Server messages** ([`ServerMessage`]): LOAD_GAME, ERROR and
//!   NOTIFICATION, tagged by `serverMessageType`.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those are turned
//!   into bytes and back.
//!
//! The protocol layer sits between transport (raw frames) and the game
//! rooms (chess semantics). It knows nothing about sockets.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientCommand) → Room (GameState)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientCommand, GameId, Recipient, ServerMessage, Username};
