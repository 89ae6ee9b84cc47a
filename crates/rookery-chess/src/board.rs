//! The 8×8 board: a plain grid of optional pieces.
//!
//! `Board` is `Copy`. Legality checks copy the board, play the move on the
//! copy, and inspect the result, so the authoritative board is never
//! touched speculatively.

use serde::{Deserialize, Serialize};

use crate::{Color, Piece, PieceType, Position};

/// An 8×8 grid where each square holds at most one piece.
///
/// Serialized as `{"squares": [[...row 1...], ..., [...row 8...]]}` with
/// `null` for empty squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces on it.
    pub const fn empty() -> Self {
        Self { squares: [[None; 8]; 8] }
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut board = Self::empty();
        for color in Color::ALL {
            for (i, kind) in BACK_RANK.iter().enumerate() {
                let col = i as u8 + 1;
                board.set(Position::new(color.home_row(), col), Some(Piece::new(color, *kind)));
                board.set(
                    Position::new(color.pawn_row(), col),
                    Some(Piece::new(color, PieceType::Pawn)),
                );
            }
        }
        board
    }

    /// Returns the piece on `pos`, if any.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        let (r, c) = pos.index();
        self.squares[r][c]
    }

    /// Overwrites `pos`. Passing `None` clears the square.
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        let (r, c) = pos.index();
        self.squares[r][c] = piece;
    }

    /// Returns `true` if no piece stands on `pos`.
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Iterates over every occupied square.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Iterates over the squares occupied by `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Finds `color`'s king. `None` only on hand-built boards without one.
    pub fn king(&self, color: Color) -> Option<Position> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceType::King)
            .map(|(pos, _)| pos)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_layout() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(
            board.get(Position::new(1, 5)),
            Some(Piece::new(Color::White, PieceType::King))
        );
        assert_eq!(
            board.get(Position::new(8, 4)),
            Some(Piece::new(Color::Black, PieceType::Queen))
        );
        assert_eq!(
            board.get(Position::new(7, 3)),
            Some(Piece::new(Color::Black, PieceType::Pawn))
        );
        assert!(board.is_empty_at(Position::new(4, 4)));
    }

    #[test]
    fn test_set_overwrites_and_clears() {
        let mut board = Board::empty();
        let sq = Position::new(4, 4);
        board.set(sq, Some(Piece::new(Color::White, PieceType::Rook)));
        board.set(sq, Some(Piece::new(Color::Black, PieceType::Bishop)));
        assert_eq!(board.get(sq), Some(Piece::new(Color::Black, PieceType::Bishop)));

        board.set(sq, None);
        assert!(board.is_empty_at(sq));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = Board::standard();
        let mut copy = original;
        copy.set(Position::new(2, 5), None);

        assert!(copy.is_empty_at(Position::new(2, 5)));
        assert!(!original.is_empty_at(Position::new(2, 5)));
    }

    #[test]
    fn test_king_lookup() {
        let board = Board::standard();
        assert_eq!(board.king(Color::White), Some(Position::new(1, 5)));
        assert_eq!(board.king(Color::Black), Some(Position::new(8, 5)));
        assert_eq!(Board::empty().king(Color::White), None);
    }
}
