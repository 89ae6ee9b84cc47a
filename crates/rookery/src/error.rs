//! Unified error type for the Rookery server.

use rookery_chess::ChessError;
use rookery_protocol::ProtocolError;
use rookery_room::RoomError;
use rookery_session::SessionError;
use rookery_store::StoreError;
use rookery_transport::TransportError;

/// Top-level error that wraps every crate-specific error.
///
/// Code built on the `rookery` crate can use this one type; `?` converts
/// the layer errors through the generated `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum RookeryError {
    /// Binding, accepting, sending or receiving failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A room was unavailable or rejected a command.
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Chess(#[from] ChessError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookery_protocol::GameId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::other("gone"));
        let rookery_err: RookeryError = err.into();
        assert!(matches!(rookery_err, RookeryError::Transport(_)));
        assert!(rookery_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_session_error() {
        let rookery_err: RookeryError = SessionError::AuthFailed("nope".into()).into();
        assert!(matches!(rookery_err, RookeryError::Session(_)));
    }

    #[test]
    fn test_from_store_error() {
        let rookery_err: RookeryError = StoreError::NotFound(GameId(3)).into();
        assert!(matches!(rookery_err, RookeryError::Store(StoreError::NotFound(GameId(3)))));
    }

    #[test]
    fn test_from_room_error() {
        let rookery_err: RookeryError = RoomError::Unavailable(GameId(1)).into();
        assert!(matches!(rookery_err, RookeryError::Room(_)));
        assert!(rookery_err.to_string().contains("game 1"));
    }

    #[test]
    fn test_from_chess_error() {
        let rookery_err: RookeryError = ChessError::GameOver.into();
        assert_eq!(rookery_err.to_string(), "the game is over");
    }
}
