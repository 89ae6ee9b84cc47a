//! Protocol types: the commands clients send, the messages the server
//! sends back, and the identifiers both refer to.
//!
//! The JSON shape is fixed by existing clients, so most of this file is
//! serde attributes. Tests at the bottom pin every shape down.

use std::fmt;

use rookery_chess::{Color, GameState, Move};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Numeric identifier of a game, `gameID` on the wire.
///
/// `#[serde(transparent)]` makes `GameId(7)` serialize as plain `7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity an auth token resolves to.
///
/// Seats are recorded by username, and the session registry keys
/// connections by it, so one username has at most one live connection per
/// game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(pub String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Username {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for Username {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who a server message is for.
///
/// Command handlers return `(Recipient, ServerMessage)` pairs and the room
/// delivers them through the session registry. Errors are never routed
/// through here; they go straight back to the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Every live connection in the game.
    All,
    /// Exactly one participant.
    Participant(Username),
    /// Everyone except the given participant.
    AllExcept(Username),
}

// ---------------------------------------------------------------------------
// ClientCommand
// ---------------------------------------------------------------------------

/// A command from a client.
///
/// Internally tagged by `commandType`, with `SCREAMING_SNAKE_CASE` variant
/// names and camelCase fields:
///
/// ```json
/// {"commandType":"MAKE_MOVE","authToken":"…","gameID":1,
///  "move":{"startPosition":{"row":2,"col":5},"endPosition":{"row":4,"col":5}}}
/// ```
///
/// `gameID` does not follow camelCase (`gameId`), hence the explicit
/// renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "commandType",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ClientCommand {
    /// Take a seat that was already claimed for this user.
    JoinPlayer {
        auth_token: String,
        #[serde(rename = "gameID")]
        game_id: GameId,
        player_color: Color,
    },

    /// Watch a game without a seat.
    JoinObserver {
        auth_token: String,
        #[serde(rename = "gameID")]
        game_id: GameId,
    },

    /// Play a move for the seat this user holds.
    MakeMove {
        auth_token: String,
        #[serde(rename = "gameID")]
        game_id: GameId,
        #[serde(rename = "move")]
        mv: Move,
    },

    /// Leave the game, freeing the seat if one is held.
    Leave {
        auth_token: String,
        #[serde(rename = "gameID")]
        game_id: GameId,
    },

    /// Concede the game.
    Resign {
        auth_token: String,
        #[serde(rename = "gameID")]
        game_id: GameId,
    },
}

impl ClientCommand {
    pub fn auth_token(&self) -> &str {
        match self {
            Self::JoinPlayer { auth_token, .. }
            | Self::JoinObserver { auth_token, .. }
            | Self::MakeMove { auth_token, .. }
            | Self::Leave { auth_token, .. }
            | Self::Resign { auth_token, .. } => auth_token,
        }
    }

    pub fn game_id(&self) -> GameId {
        match self {
            Self::JoinPlayer { game_id, .. }
            | Self::JoinObserver { game_id, .. }
            | Self::MakeMove { game_id, .. }
            | Self::Leave { game_id, .. }
            | Self::Resign { game_id, .. } => *game_id,
        }
    }

    /// The wire name of the command, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::JoinPlayer { .. } => "JOIN_PLAYER",
            Self::JoinObserver { .. } => "JOIN_OBSERVER",
            Self::MakeMove { .. } => "MAKE_MOVE",
            Self::Leave { .. } => "LEAVE",
            Self::Resign { .. } => "RESIGN",
        }
    }
}

// ---------------------------------------------------------------------------
// ServerMessage
// ---------------------------------------------------------------------------

/// A message from the server, tagged by `serverMessageType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "serverMessageType",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    /// A full snapshot of the game.
    LoadGame { game: GameState },

    /// Something the requester did was rejected. Only ever sent to them.
    Error { error_message: String },

    /// Human-readable news about the game.
    Notification { message: String },
}

impl ServerMessage {
    pub fn load_game(game: &GameState) -> Self {
        Self::LoadGame { game: game.clone() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error_message: message.into(),
        }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rookery_chess::{PieceType, Position};
    use serde_json::json;

    #[test]
    fn test_game_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&GameId(42)).unwrap(), "42");
    }

    #[test]
    fn test_username_serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&Username::from("alice")).unwrap(), "\"alice\"");
    }

    #[test]
    fn test_join_player_json_format() {
        let cmd = ClientCommand::JoinPlayer {
            auth_token: "tok".into(),
            game_id: GameId(7),
            player_color: Color::Black,
        };
        let value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(
            value,
            json!({
                "commandType": "JOIN_PLAYER",
                "authToken": "tok",
                "gameID": 7,
                "playerColor": "BLACK"
            })
        );
    }

    #[test]
    fn test_make_move_decodes_from_client_json() {
        let raw = json!({
            "commandType": "MAKE_MOVE",
            "authToken": "tok",
            "gameID": 1,
            "move": {
                "startPosition": {"row": 7, "col": 1},
                "endPosition": {"row": 8, "col": 1},
                "promotionPiece": "QUEEN"
            }
        });
        let cmd: ClientCommand = serde_json::from_value(raw).unwrap();

        assert_eq!(
            cmd,
            ClientCommand::MakeMove {
                auth_token: "tok".into(),
                game_id: GameId(1),
                mv: Move::promoting(Position::new(7, 1), Position::new(8, 1), PieceType::Queen),
            }
        );
        assert_eq!(cmd.kind(), "MAKE_MOVE");
        assert_eq!(cmd.auth_token(), "tok");
    }

    #[test]
    fn test_make_move_with_null_promotion() {
        let raw = json!({
            "commandType": "MAKE_MOVE",
            "authToken": "tok",
            "gameID": 1,
            "move": {
                "startPosition": {"row": 2, "col": 5},
                "endPosition": {"row": 4, "col": 5},
                "promotionPiece": null
            }
        });
        let cmd: ClientCommand = serde_json::from_value(raw).unwrap();
        assert!(matches!(cmd, ClientCommand::MakeMove { mv, .. } if mv.promotion.is_none()));
    }

    #[test]
    fn test_simple_commands_decode() {
        for (tag, expected) in [
            ("JOIN_OBSERVER", "JOIN_OBSERVER"),
            ("LEAVE", "LEAVE"),
            ("RESIGN", "RESIGN"),
        ] {
            let raw = json!({"commandType": tag, "authToken": "t", "gameID": 9});
            let cmd: ClientCommand = serde_json::from_value(raw).unwrap();
            assert_eq!(cmd.kind(), expected);
            assert_eq!(cmd.game_id(), GameId(9));
        }
    }

    #[test]
    fn test_unknown_command_type_is_rejected() {
        let raw = json!({"commandType": "CONNECT", "authToken": "t", "gameID": 1});
        assert!(serde_json::from_value::<ClientCommand>(raw).is_err());
    }

    #[test]
    fn test_join_player_without_color_is_rejected() {
        let raw = json!({"commandType": "JOIN_PLAYER", "authToken": "t", "gameID": 1});
        assert!(serde_json::from_value::<ClientCommand>(raw).is_err());
    }

    #[test]
    fn test_off_board_move_is_rejected() {
        let raw = json!({
            "commandType": "MAKE_MOVE",
            "authToken": "t",
            "gameID": 1,
            "move": {"startPosition": {"row": 0, "col": 5}, "endPosition": {"row": 4, "col": 5}}
        });
        assert!(serde_json::from_value::<ClientCommand>(raw).is_err());
    }

    #[test]
    fn test_error_message_json_format() {
        let value = serde_json::to_value(ServerMessage::error("Error: not your turn")).unwrap();
        assert_eq!(
            value,
            json!({"serverMessageType": "ERROR", "errorMessage": "Error: not your turn"})
        );
    }

    #[test]
    fn test_notification_json_format() {
        let value = serde_json::to_value(ServerMessage::notification("bob joined")).unwrap();
        assert_eq!(
            value,
            json!({"serverMessageType": "NOTIFICATION", "message": "bob joined"})
        );
    }

    #[test]
    fn test_load_game_carries_game_state() {
        let value = serde_json::to_value(ServerMessage::load_game(&GameState::new())).unwrap();

        assert_eq!(value["serverMessageType"], "LOAD_GAME");
        assert_eq!(value["game"]["turnColor"], "WHITE");
        assert_eq!(value["game"]["gameOver"], false);
    }
}
