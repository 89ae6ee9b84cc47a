//! Pseudo-legal move generation.
//!
//! These functions look only at the board: they follow each piece's
//! movement pattern and occupancy rules but ignore whether the mover's own
//! king ends up attacked. Castling and en passant depend on game history
//! and are added by [`GameState::valid_moves`](crate::GameState::valid_moves).

use crate::{Board, Color, Move, Piece, PieceType, Position};

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

/// Returns every pseudo-legal move for the piece on `from`.
///
/// Empty if `from` is unoccupied.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> Vec<Move> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    match piece.kind {
        PieceType::Rook => slide(board, from, piece, &ORTHOGONAL, &mut moves),
        PieceType::Bishop => slide(board, from, piece, &DIAGONAL, &mut moves),
        PieceType::Queen => slide(board, from, piece, &ALL_DIRECTIONS, &mut moves),
        PieceType::Knight => step(board, from, piece, &KNIGHT_JUMPS, &mut moves),
        PieceType::King => step(board, from, piece, &ALL_DIRECTIONS, &mut moves),
        PieceType::Pawn => pawn(board, from, piece.color, &mut moves),
    }
    moves
}

/// Walks each ray until the edge or the first piece, capturing it if it
/// belongs to the other side.
fn slide(board: &Board, from: Position, piece: Piece, rays: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(dr, dc) in rays {
        let mut cursor = from.offset(dr, dc);
        while let Some(to) = cursor {
            match board.get(to) {
                None => out.push(Move::new(from, to)),
                Some(other) => {
                    if piece.is_enemy_of(&other) {
                        out.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cursor = to.offset(dr, dc);
        }
    }
}

/// One hop per offset; the target must be empty or hold an enemy piece.
fn step(board: &Board, from: Position, piece: Piece, offsets: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(dr, dc) in offsets {
        let Some(to) = from.offset(dr, dc) else {
            continue;
        };
        match board.get(to) {
            Some(other) if !piece.is_enemy_of(&other) => {}
            _ => out.push(Move::new(from, to)),
        }
    }
}

fn pawn(board: &Board, from: Position, color: Color, out: &mut Vec<Move>) {
    let dir = color.forward();

    // Forward pushes never capture.
    if let Some(one) = from.offset(dir, 0).filter(|sq| board.is_empty_at(*sq)) {
        push_pawn_move(from, one, color, out);

        if from.row() == color.pawn_row() {
            if let Some(two) = one.offset(dir, 0).filter(|sq| board.is_empty_at(*sq)) {
                out.push(Move::new(from, two));
            }
        }
    }

    // Diagonals always capture.
    for dc in [-1, 1] {
        let Some(to) = from.offset(dir, dc) else {
            continue;
        };
        if board.get(to).is_some_and(|target| target.color != color) {
            push_pawn_move(from, to, color, out);
        }
    }
}

/// A pawn landing on the farthest row yields one move per promotion kind
/// instead of a plain move.
fn push_pawn_move(from: Position, to: Position, color: Color, out: &mut Vec<Move>) {
    if to.row() == color.promotion_row() {
        out.extend(PieceType::PROMOTIONS.iter().map(|&kind| Move::promoting(from, to, kind)));
    } else {
        out.push(Move::new(from, to));
    }
}
