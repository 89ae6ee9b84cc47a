//! Participant identity and live connections for Rookery.
//!
//! 1. **Authentication**: turning an auth token into a [`Username`]
//!    ([`Authenticator`] trait, [`MemoryAuthenticator`]).
//! 2. **Session registry**: the live connections of one game, with
//!    targeted sends, broadcasts, and pruning of dead peers
//!    ([`SessionRegistry`]).
//!
//! ```text
//! Room Layer (above)     ← one registry per game, owned by its room actor
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below) ← Username, ServerMessage, Recipient
//! ```
//!
//! [`Username`]: rookery_protocol::Username

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod registry;

pub use auth::{Authenticator, MemoryAuthenticator};
pub use error::SessionError;
pub use registry::{Outbox, SessionRegistry};
