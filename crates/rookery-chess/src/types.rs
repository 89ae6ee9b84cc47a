//! Value types shared by every layer of the rules engine.
//!
//! Everything here is a small `Copy` value: colors, piece kinds, pieces,
//! board coordinates, and moves. They all derive `Serialize`/`Deserialize`
//! because full game snapshots travel to clients inside `LOAD_GAME`
//! messages, and moves arrive from clients inside `MAKE_MOVE` commands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PositionError;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One of the two sides. Serialized as `"WHITE"` / `"BLACK"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors, white first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Returns the other side.
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row the king and rooks start on (1 for white, 8 for black).
    pub const fn home_row(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 8,
        }
    }

    /// Row this side's pawns start on. Only from here may a pawn
    /// advance two squares.
    pub const fn pawn_row(self) -> u8 {
        match self {
            Self::White => 2,
            Self::Black => 7,
        }
    }

    /// The farthest row, where pawns promote.
    pub const fn promotion_row(self) -> u8 {
        self.opposite().home_row()
    }

    /// Row delta of one pawn step forward.
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "WHITE"),
            Self::Black => write!(f, "BLACK"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType / Piece
// ---------------------------------------------------------------------------

/// The six kinds of chess piece. Serialized as `"KING"`, `"QUEEN"`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// The kinds a pawn may promote to, in the order promotion moves
    /// are generated.
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::King => "KING",
            Self::Queen => "QUEEN",
            Self::Rook => "ROOK",
            Self::Bishop => "BISHOP",
            Self::Knight => "KNIGHT",
            Self::Pawn => "PAWN",
        };
        f.write_str(name)
    }
}

/// A colored piece. Equality is structural: two white knights are equal
/// no matter where they stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    #[serde(rename = "type")]
    pub kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self { color, kind }
    }

    /// Returns `true` if `other` belongs to the opposing side.
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.color != other.color
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A square on the board, as `(row, col)` with both in `1..=8`.
///
/// Row 1 is white's back rank; column 1 is the a-file. A `Position` that
/// exists is always in range: literal construction asserts it, offsets go
/// through [`Position::offset`] which returns `None` off the board, and
/// deserialization rejects out-of-range values via `try_from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

/// Unchecked wire shape of a position, validated into [`Position`].
#[derive(Deserialize)]
struct RawPosition {
    row: i32,
    col: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = PositionError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::checked(raw.row, raw.col)
            .ok_or(PositionError::OutOfRange { row: raw.row, col: raw.col })
    }
}

impl Position {
    /// Creates a position from in-range coordinates.
    ///
    /// # Panics
    /// If `row` or `col` is outside `1..=8`. Use [`Position::checked`] for
    /// untrusted input.
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row >= 1 && row <= 8 && col >= 1 && col <= 8, "position out of range");
        Self { row, col }
    }

    /// Creates a position, or `None` if either coordinate is off the board.
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Some(Self { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    /// The square `dr` rows and `dc` columns away, if it is on the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        Self::checked(
            i32::from(self.row) + i32::from(dr),
            i32::from(self.col) + i32::from(dc),
        )
    }

    /// Iterates over all 64 squares, row by row from a1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |col| Position { row, col }))
    }

    /// Zero-based `(row, col)` array indices.
    pub(crate) fn index(self) -> (usize, usize) {
        (usize::from(self.row - 1), usize::from(self.col - 1))
    }
}

/// Algebraic notation: `Position::new(2, 5)` prints as `e2`.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.col - 1);
        write!(f, "{file}{}", self.row)
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(PositionError::Malformed(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(PositionError::Malformed(s.to_string()));
        }
        Ok(Self {
            row: rank - b'0',
            col: file - b'a' + 1,
        })
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A move from `start` to `end`, with the piece a pawn promotes to when it
/// lands on the farthest row.
///
/// Castling is expressed as the king's two-square move (`e1` → `g1`), and
/// en passant as the capturing pawn's diagonal move onto the empty square
/// behind the captured pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    #[serde(rename = "startPosition")]
    pub start: Position,
    #[serde(rename = "endPosition")]
    pub end: Position,
    #[serde(rename = "promotionPiece", default)]
    pub promotion: Option<PieceType>,
}

impl Move {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end, promotion: None }
    }

    pub const fn promoting(start: Position, end: Position, kind: PieceType) -> Self {
        Self { start, end, promotion: Some(kind) }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "={kind}")?;
        }
        Ok(())
    }
}
