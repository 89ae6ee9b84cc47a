//! Room actor: one Tokio task per game.
//!
//! The task owns the game's connection registry and pulls commands off a
//! bounded queue one at a time. Fetch, validate, apply, persist and
//! broadcast for one command all finish before the next command is looked
//! at, which is what keeps concurrent moves on one game from racing.

use std::sync::Arc;

use rookery_protocol::{ClientCommand, GameId, Recipient, ServerMessage, Username};
use rookery_session::{Outbox, SessionRegistry};
use rookery_store::GameRepository;
use tokio::sync::{mpsc, oneshot};

use crate::commands::Context;
use crate::{CommandError, RoomConfig, RoomError};

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Execute a client command on behalf of an authenticated user.
    Client {
        username: Username,
        command: ClientCommand,
        /// The requester's own connection. Errors go here, and joins
        /// register it.
        outbox: Outbox,
        reply: oneshot::Sender<Result<(), CommandError>>,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    /// A connection that may be registered here has ended.
    Disconnected,

    Shutdown,
}

/// A snapshot of who is connected to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub game_id: GameId,
    /// Registered usernames, sorted.
    pub participants: Vec<Username>,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    game_id: GameId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Queues `command` and waits until the room has executed it.
    ///
    /// By the time this returns, every message the command produced
    /// (including an error for the requester) has been queued on the
    /// relevant outboxes.
    ///
    /// # Errors
    /// - [`RoomError::Command`] if the command was rejected
    /// - [`RoomError::Unavailable`] if the actor stopped before running
    ///   it; the command had no effect and may be retried on a new room
    pub async fn submit(
        &self,
        username: Username,
        command: ClientCommand,
        outbox: Outbox,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Client {
                username,
                command,
                outbox,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))?
            .map_err(RoomError::Command)
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))?;
        reply_rx.await.map_err(|_| RoomError::Unavailable(self.game_id))
    }

    /// Tells the room that a connection which used it has gone away.
    ///
    /// The room drops every registered outbox that is now closed and stops
    /// if that leaves it empty. Callers must drop the connection's receiver
    /// first, or the outbox still reads as open.
    pub async fn notify_disconnect(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnected)
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))
    }

    /// Tells the room to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.game_id))
    }
}

struct RoomActor<R> {
    game_id: GameId,
    config: RoomConfig,
    registry: SessionRegistry,
    repository: Arc<R>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<R: GameRepository> RoomActor<R> {
    async fn run(mut self) {
        tracing::info!(game_id = %self.game_id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Client {
                    username,
                    command,
                    outbox,
                    reply,
                } => {
                    let result = self.handle_client(&username, command, outbox).await;
                    let _ = reply.send(result);

                    if self.sweep().await {
                        break;
                    }
                }
                RoomCommand::Disconnected => {
                    if self.sweep().await {
                        break;
                    }
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(RoomInfo {
                        game_id: self.game_id,
                        participants: self.registry.participants().await,
                    });
                }
                RoomCommand::Shutdown => {
                    tracing::info!(game_id = %self.game_id, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(game_id = %self.game_id, "room actor stopped");
    }

    /// Prunes closed connections. Returns `true` if the room should stop
    /// because nobody is left.
    async fn sweep(&self) -> bool {
        let pruned = self.registry.prune_closed().await;
        if pruned > 0 {
            tracing::debug!(game_id = %self.game_id, pruned, "dropped closed connections");
        }

        if self.config.close_when_empty && self.registry.is_empty().await {
            tracing::debug!(game_id = %self.game_id, "no participants left");
            return true;
        }
        false
    }

    async fn handle_client(
        &self,
        username: &Username,
        command: ClientCommand,
        outbox: Outbox,
    ) -> Result<(), CommandError> {
        let kind = command.kind();
        let ctx = Context {
            game_id: self.game_id,
            config: &self.config,
            registry: &self.registry,
            repository: self.repository.as_ref(),
        };

        match ctx.execute(username, command, outbox.clone()).await {
            Ok(outgoing) => {
                self.dispatch(outgoing).await;
                Ok(())
            }
            Err(err) => {
                match &err {
                    CommandError::Internal(detail) => tracing::warn!(
                        game_id = %self.game_id, %username, command = kind, %detail,
                        "command failed"
                    ),
                    _ => tracing::debug!(
                        game_id = %self.game_id, %username, command = kind, error = %err,
                        "command rejected"
                    ),
                }
                let _ = outbox.send(ServerMessage::error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn dispatch(&self, outgoing: Vec<(Recipient, ServerMessage)>) {
        for (recipient, message) in outgoing {
            self.registry.deliver(&recipient, &message).await;
        }
    }
}

/// Spawns a room actor for `game_id` and returns its handle.
pub(crate) fn spawn_room<R: GameRepository>(
    game_id: GameId,
    config: RoomConfig,
    repository: Arc<R>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));

    let actor = RoomActor {
        game_id,
        config,
        registry: SessionRegistry::new(),
        repository,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { game_id, sender: tx }
}
