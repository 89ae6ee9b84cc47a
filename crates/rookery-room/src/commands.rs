//! What each client command does to a game.
//!
//! Every function here runs inside the game's room task, so for a given
//! game they never overlap. Each one loads the record, checks it, and on
//! success persists before returning the messages to deliver. A rejected
//! command changes nothing and returns a [`CommandError`] that only the
//! requester will see.

use rookery_chess::{Color, GameStatus, Move};
use rookery_protocol::{ClientCommand, GameId, Recipient, ServerMessage, Username};
use rookery_session::{Outbox, SessionRegistry};
use rookery_store::{GameRecord, GameRepository};

use crate::{CommandError, RoomConfig};

pub(crate) type Outgoing = Vec<(Recipient, ServerMessage)>;

/// Borrowed view of a room's state for the duration of one command.
pub(crate) struct Context<'a, R> {
    pub(crate) game_id: GameId,
    pub(crate) config: &'a RoomConfig,
    pub(crate) registry: &'a SessionRegistry,
    pub(crate) repository: &'a R,
}

impl<R: GameRepository> Context<'_, R> {
    pub(crate) async fn execute(
        &self,
        username: &Username,
        command: ClientCommand,
        outbox: Outbox,
    ) -> Result<Outgoing, CommandError> {
        match command {
            ClientCommand::JoinPlayer { player_color, .. } => {
                self.join_player(username, player_color, outbox).await
            }
            ClientCommand::JoinObserver { .. } => self.join_observer(username, outbox).await,
            ClientCommand::MakeMove { mv, .. } => self.make_move(username, mv).await,
            ClientCommand::Leave { .. } => self.leave(username).await,
            ClientCommand::Resign { .. } => self.resign(username).await,
        }
    }

    async fn load(&self) -> Result<GameRecord, CommandError> {
        Ok(self.repository.get_game(self.game_id).await?)
    }

    async fn save(&self, record: GameRecord) -> Result<(), CommandError> {
        self.repository.update_game(record).await.map_err(|e| {
            tracing::warn!(game_id = %self.game_id, error = %e, "failed to persist game");
            CommandError::from(e)
        })
    }

    async fn join_player(
        &self,
        username: &Username,
        color: Color,
        outbox: Outbox,
    ) -> Result<Outgoing, CommandError> {
        let record = self.load().await?;

        if record.username_for(color) != Some(username) {
            let reason = if record.username_for(color.opposite()) == Some(username) {
                format!("you are seated as {}, not {color}", color.opposite())
            } else if record.username_for(color).is_some() {
                format!("the {color} seat belongs to another player")
            } else {
                format!("the {color} seat has not been claimed; join the game first")
            };
            return Err(CommandError::SeatConflict(reason));
        }

        self.registry.add(username.clone(), outbox).await;
        tracing::info!(game_id = %self.game_id, %username, %color, "player joined");

        Ok(vec![
            (
                Recipient::AllExcept(username.clone()),
                ServerMessage::notification(format!("{username} has joined the game as {color}")),
            ),
            (
                Recipient::Participant(username.clone()),
                ServerMessage::load_game(&record.game),
            ),
        ])
    }

    async fn join_observer(&self, username: &Username, outbox: Outbox) -> Result<Outgoing, CommandError> {
        if !self.config.allow_observers {
            return Err(CommandError::SeatConflict(
                "observers are not allowed in this game".into(),
            ));
        }
        let record = self.load().await?;

        self.registry.add(username.clone(), outbox).await;
        tracing::info!(game_id = %self.game_id, %username, "observer joined");

        Ok(vec![
            (
                Recipient::AllExcept(username.clone()),
                ServerMessage::notification(format!(
                    "{username} is now observing game {}",
                    self.game_id
                )),
            ),
            (
                Recipient::Participant(username.clone()),
                ServerMessage::load_game(&record.game),
            ),
        ])
    }

    async fn make_move(&self, username: &Username, mv: Move) -> Result<Outgoing, CommandError> {
        let mut record = self.load().await?;
        if record.game.is_over() {
            return Err(CommandError::GameOver);
        }

        let turn = record.game.turn();
        if record.username_for(turn) != Some(username) {
            return Err(match record.seat_of(username) {
                Some(_) => CommandError::WrongTurn(turn),
                None => CommandError::SeatConflict("observers cannot make moves".into()),
            });
        }

        record.game.apply_move(mv)?;
        let status = record.game.status();
        let snapshot = ServerMessage::load_game(&record.game);
        self.save(record).await?;

        tracing::info!(game_id = %self.game_id, %username, %mv, "move applied");

        let mut out = vec![
            (
                Recipient::AllExcept(username.clone()),
                ServerMessage::notification(format!("{username} moved {mv}")),
            ),
            (Recipient::All, snapshot),
        ];
        let verdict = match status {
            GameStatus::Ongoing => None,
            GameStatus::Check(color) => Some(format!("{color} is in check")),
            GameStatus::Checkmate(color) => {
                Some(format!("{color} is in checkmate. {} wins", color.opposite()))
            }
            GameStatus::Stalemate(color) => {
                Some(format!("{color} is in stalemate. The game is a draw"))
            }
        };
        if let Some(text) = verdict {
            tracing::info!(game_id = %self.game_id, status = %text, "position status");
            out.push((Recipient::All, ServerMessage::notification(text)));
        }
        Ok(out)
    }

    async fn leave(&self, username: &Username) -> Result<Outgoing, CommandError> {
        // A vanished game leaves nothing to free, so the connection goes
        // either way. Any other failure keeps it registered with its seat.
        let mut record = match self.load().await {
            Ok(record) => record,
            Err(err @ CommandError::GameNotFound(_)) => {
                self.registry.remove(username).await;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let seats: Vec<Color> = Color::ALL
            .into_iter()
            .filter(|&color| record.username_for(color) == Some(username))
            .collect();

        let text = if seats.is_empty() {
            format!("{username} has left game {} as an observer", self.game_id)
        } else {
            for &color in &seats {
                record.clear_seat(color);
            }
            self.save(record).await?;
            format!("{username} has left game {}", self.game_id)
        };
        self.registry.remove(username).await;
        tracing::info!(game_id = %self.game_id, %username, freed_seats = seats.len(), "participant left");

        Ok(vec![(
            Recipient::AllExcept(username.clone()),
            ServerMessage::notification(text),
        )])
    }

    async fn resign(&self, username: &Username) -> Result<Outgoing, CommandError> {
        let mut record = self.load().await?;
        if record.seat_of(username).is_none() {
            return Err(CommandError::SeatConflict("observers cannot resign".into()));
        }

        record.game.resign()?;
        self.save(record).await?;
        tracing::info!(game_id = %self.game_id, %username, "player resigned");

        Ok(vec![(
            Recipient::All,
            ServerMessage::notification(format!("{username} has resigned. The game is over")),
        )])
    }
}
