//! Board-only attack queries used by the legality filter.

use crate::{Board, Color, Move, Piece, PieceType, Position};

/// Returns `true` if a `by` piece could capture on `target`.
///
/// Pawns attack diagonally forward only; their pushes never count. Sliding
/// pieces stop at the first occupied square, whoever owns it, so a square
/// defended by its own side is still attacked.
pub fn is_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, piece)| attacks(board, from, piece, target))
}

fn attacks(board: &Board, from: Position, piece: Piece, target: Position) -> bool {
    let dr = target.row() as i8 - from.row() as i8;
    let dc = target.col() as i8 - from.col() as i8;
    let straight = (dr == 0) != (dc == 0);
    let diagonal = dr != 0 && dr.abs() == dc.abs();

    match piece.kind {
        PieceType::Pawn => dr == piece.color.forward() && dc.abs() == 1,
        PieceType::Knight => matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1)),
        PieceType::King => (dr, dc) != (0, 0) && dr.abs() <= 1 && dc.abs() <= 1,
        PieceType::Rook => straight && ray_is_clear(board, from, target),
        PieceType::Bishop => diagonal && ray_is_clear(board, from, target),
        PieceType::Queen => (straight || diagonal) && ray_is_clear(board, from, target),
    }
}

/// Walks from `from` toward `target` along a rank, file or diagonal and
/// reports whether every square strictly between them is empty.
fn ray_is_clear(board: &Board, from: Position, target: Position) -> bool {
    let dr = (target.row() as i8 - from.row() as i8).signum();
    let dc = (target.col() as i8 - from.col() as i8).signum();

    let mut next = from.offset(dr, dc);
    while let Some(pos) = next {
        if pos == target {
            return true;
        }
        if !board.is_empty_at(pos) {
            return false;
        }
        next = pos.offset(dr, dc);
    }
    false
}

/// Returns `true` if `color`'s king is attacked. A board without that king
/// is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    board
        .king(color)
        .is_some_and(|king| is_attacked(board, king, color.opposite()))
}

/// Plays an ordinary move on a copy of `board`: clears the start square and
/// puts the piece (or its promotion) on the end square.
pub(crate) fn simulate(board: &Board, mv: &Move, piece: Piece) -> Board {
    let mut next = *board;
    next.set(mv.start, None);
    let placed = mv.promotion.map_or(piece, |kind| Piece::new(piece.color, kind));
    next.set(mv.end, Some(placed));
    next
}
