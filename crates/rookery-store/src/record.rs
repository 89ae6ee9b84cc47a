//! The stored shape of a game: seat assignments plus full game state.

use rookery_chess::{Color, GameState};
use rookery_protocol::{GameId, Username};
use serde::{Deserialize, Serialize};

/// One stored game: its seats, its name, and its full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    #[serde(rename = "gameID")]
    pub game_id: GameId,
    pub white_username: Option<Username>,
    pub black_username: Option<Username>,
    pub game_name: String,
    pub game: GameState,
}

impl GameRecord {
    /// A new game with both seats open.
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        Self {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.into(),
            game: GameState::new(),
        }
    }

    /// Who sits in `color`'s seat.
    pub fn username_for(&self, color: Color) -> Option<&Username> {
        match color {
            Color::White => self.white_username.as_ref(),
            Color::Black => self.black_username.as_ref(),
        }
    }

    /// The seat `username` holds. If they somehow hold both, white wins.
    pub fn seat_of(&self, username: &Username) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.username_for(color) == Some(username))
    }

    pub fn set_seat(&mut self, color: Color, username: Option<Username>) {
        match color {
            Color::White => self.white_username = username,
            Color::Black => self.black_username = username,
        }
    }

    /// Opens `color`'s seat again.
    pub fn clear_seat(&mut self, color: Color) {
        self.set_seat(color, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_lookup() {
        let mut record = GameRecord::new(GameId(1), "casual");
        record.set_seat(Color::Black, Some(Username::from("bob")));

        assert_eq!(record.seat_of(&Username::from("bob")), Some(Color::Black));
        assert_eq!(record.seat_of(&Username::from("alice")), None);
        assert_eq!(record.username_for(Color::White), None);

        record.clear_seat(Color::Black);
        assert_eq!(record.seat_of(&Username::from("bob")), None);
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = GameRecord::new(GameId(4), "lunch");
        record.set_seat(Color::White, Some(Username::from("alice")));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["gameID"], 4);
        assert_eq!(json["whiteUsername"], "alice");
        assert!(json["blackUsername"].is_null());
        assert_eq!(json["gameName"], "lunch");
        assert_eq!(json["game"]["turnColor"], "WHITE");
    }
}
