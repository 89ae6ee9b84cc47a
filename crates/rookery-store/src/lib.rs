//! Game persistence for Rookery.
//!
//! The server treats a [`GameRepository`] as the only durable copy of a
//! game: every mutating command loads the [`GameRecord`], changes it, and
//! writes it back before anything is broadcast. Nothing is cached between
//! commands.
//!
//! [`MemoryGameRepository`] is the in-process implementation. It also
//! carries the lobby operations (create a game, claim a seat) that a
//! separate HTTP service would otherwise own.

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod record;

pub use error::StoreError;
pub use memory::MemoryGameRepository;
pub use record::GameRecord;

use rookery_protocol::GameId;

/// Loads and saves game records.
///
/// `Send + Sync + 'static` because one repository is shared by every room
/// actor.
pub trait GameRepository: Send + Sync + 'static {
    /// Loads the record for `game_id`.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if no such game exists
    /// - [`StoreError::Unavailable`] if the backend failed
    fn get_game(
        &self,
        game_id: GameId,
    ) -> impl std::future::Future<Output = Result<GameRecord, StoreError>> + Send;

    /// Replaces the stored record with `record` (matched by its `game_id`).
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] if no such game exists
    /// - [`StoreError::Unavailable`] if the backend failed
    fn update_game(
        &self,
        record: GameRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
