//! Per-game command processing for Rookery.
//!
//! Every game ID gets its own room: a Tokio task that owns the game's
//! [`SessionRegistry`](rookery_session::SessionRegistry) and executes
//! commands for that game one at a time, in arrival order. Two moves for
//! the same game can therefore never both validate against the same
//! board; different games run fully in parallel.
//!
//! # Key types
//!
//! - [`RoomManager`]: finds or spawns the room for a game ID
//! - [`RoomHandle`]: submits commands to a running room
//! - [`RoomConfig`]: channel size, observer policy, idle shutdown
//! - [`CommandError`]: everything a command can be rejected for

mod commands;
mod config;
mod error;
mod manager;
mod room;

pub use config::RoomConfig;
pub use error::{CommandError, RoomError};
pub use manager::RoomManager;
pub use room::{RoomHandle, RoomInfo};
