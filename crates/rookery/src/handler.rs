//! Per-connection handler: decode, authenticate, route to the game's room.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! plus a writer task that drains the connection's outbox. The flow is:
//!   1. Receive a frame and decode a `ClientCommand`
//!   2. Authenticate its token to a username
//!   3. Hand the command to the room for its game ID and wait
//!
//! Rooms never write to the socket themselves. They push `ServerMessage`s
//! into the outbox, and the writer encodes and sends them in order.

use std::collections::HashSet;
use std::sync::Arc;

use rookery_protocol::{ClientCommand, Codec, GameId, ServerMessage, Username};
use rookery_room::{CommandError, RoomError};
use rookery_session::{Authenticator, Outbox};
use rookery_store::GameRepository;
use rookery_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, R, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, R, C>>,
) where
    A: Authenticator,
    R: GameRepository,
    C: Codec,
{
    let conn = Arc::new(conn);
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (outbox, inbox) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_loop(Arc::clone(&conn), Arc::clone(&state), inbox));
    let mut games: HashSet<GameId> = HashSet::new();

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let command: ClientCommand = match state.codec.decode(&data) {
            Ok(command) => command,
            Err(e) => {
                let err = CommandError::from(e);
                tracing::debug!(%conn_id, error = %err, "dropping malformed frame");
                continue;
            }
        };

        let username = match state.auth.authenticate(command.auth_token()).await {
            Ok(username) => username,
            Err(e) => {
                let err = CommandError::from(e);
                tracing::debug!(
                    %conn_id, command = command.kind(), error = %err,
                    "authentication failed"
                );
                let _ = outbox.send(ServerMessage::error(err.to_string()));
                continue;
            }
        };

        games.insert(command.game_id());
        route(&state, conn_id, username, command, &outbox).await;
    }

    // The writer owns the outbox receiver. Once it has finished, every
    // room still holding a clone of `outbox` sees it closed.
    writer.abort();
    let _ = writer.await;
    notify_rooms(&state, conn_id, games).await;

    if let Err(e) = conn.close().await {
        tracing::debug!(%conn_id, error = %e, "close after disconnect failed");
    }
}

/// Submits `command` to its game's room.
///
/// A room that stopped between lookup and submit never ran the command, so
/// one retry on a freshly spawned room is safe.
async fn route<A, R, C>(
    state: &ServerState<A, R, C>,
    conn_id: ConnectionId,
    username: Username,
    command: ClientCommand,
    outbox: &Outbox,
) where
    R: GameRepository,
{
    let game_id = command.game_id();
    let kind = command.kind();

    for attempt in 0..2 {
        let handle = state.rooms.lock().await.room(game_id);

        match handle.submit(username.clone(), command.clone(), outbox.clone()).await {
            Ok(()) => {
                tracing::debug!(%conn_id, %username, %game_id, command = kind, "command executed");
                return;
            }
            // The room already sent the error to this client.
            Err(RoomError::Command(_)) => return,
            Err(RoomError::Unavailable(_)) if attempt == 0 => {
                tracing::debug!(%game_id, "room stopped before running command, retrying");
            }
            Err(e @ RoomError::Unavailable(_)) => {
                tracing::warn!(%conn_id, %game_id, command = kind, error = %e, "command dropped");
                let err = CommandError::Internal(e.to_string());
                let _ = outbox.send(ServerMessage::error(err.to_string()));
            }
        }
    }
}

/// Tells each room this connection used that it has gone, so rooms left
/// with no participants stop.
async fn notify_rooms<A, R, C>(
    state: &ServerState<A, R, C>,
    conn_id: ConnectionId,
    games: HashSet<GameId>,
) where
    R: GameRepository,
{
    for game_id in games {
        let Some(handle) = state.rooms.lock().await.live_room(game_id) else {
            continue;
        };
        if let Err(e) = handle.notify_disconnect().await {
            tracing::debug!(%conn_id, %game_id, error = %e, "room gone before disconnect notice");
        }
    }
}

/// Encodes queued messages and writes them to the socket in order.
async fn write_loop<A, R, C>(
    conn: Arc<WebSocketConnection>,
    state: Arc<ServerState<A, R, C>>,
    mut inbox: mpsc::UnboundedReceiver<ServerMessage>,
) where
    R: GameRepository,
    C: Codec,
{
    let conn_id = conn.id();

    while let Some(message) = inbox.recv().await {
        let bytes = match state.codec.encode(&message) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode message");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
}
