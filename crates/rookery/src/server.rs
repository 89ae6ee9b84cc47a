//! `RookeryServer` builder and accept loop.
//!
//! This is the entry point for running a chess server. It wires the
//! layers together: transport → protocol → session → room.

use std::net::SocketAddr;
use std::sync::Arc;

use rookery_protocol::{Codec, JsonCodec};
use rookery_room::{RoomConfig, RoomManager};
use rookery_session::Authenticator;
use rookery_store::GameRepository;
use rookery_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::RookeryError;

/// Shared server state passed to each connection task.
///
/// The room manager sits behind a `Mutex`, but handlers only hold it long
/// enough to clone a room handle. The command itself runs in the room.
pub(crate) struct ServerState<A, R: GameRepository, C> {
    pub(crate) rooms: Mutex<RoomManager<R>>,
    pub(crate) auth: A,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Rookery server.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use rookery::prelude::*;
///
/// let repository = Arc::new(MemoryGameRepository::new());
/// let server = RookeryServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(MemoryAuthenticator::new(), repository)
///     .await?;
/// server.run().await
/// ```
pub struct RookeryServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl RookeryServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every room is spawned with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and assembles the server.
    ///
    /// Frames are JSON over WebSocket.
    ///
    /// # Errors
    /// [`RookeryError::Transport`] if the address cannot be bound.
    pub async fn build<A, R>(
        self,
        auth: A,
        repository: Arc<R>,
    ) -> Result<RookeryServer<A, R, JsonCodec>, RookeryError>
    where
        A: Authenticator,
        R: GameRepository,
    {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomManager::new(repository, self.room_config)),
            auth,
            codec: JsonCodec,
        });

        Ok(RookeryServer { transport, state })
    }
}

impl Default for RookeryServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Rookery server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RookeryServer<A, R: GameRepository, C> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, R, C>>,
}

impl<A, R, C> RookeryServer<A, R, C>
where
    A: Authenticator,
    R: GameRepository,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, RookeryError> {
        Ok(self.transport.local_addr()?)
    }

    /// Number of game rooms currently running.
    pub async fn room_count(&self) -> usize {
        self.state.rooms.lock().await.room_count()
    }

    /// Runs the accept loop.
    ///
    /// Each accepted connection gets its own task. Runs until the process
    /// is terminated; a failed accept is logged and skipped.
    pub async fn run(mut self) -> Result<(), RookeryError> {
        tracing::info!("Rookery server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_connection(conn, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
