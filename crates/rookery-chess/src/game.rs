//! The game state machine: one board plus everything the board alone
//! cannot tell you (whose turn it is, castling rights, the en-passant
//! target, and whether the game has ended).
//!
//! # Legality
//!
//! A move is legal if it is pseudo-legal for its piece and, played on a
//! copy of the board, does not leave the mover's king attacked. That
//! simulate-and-check is the only legality test; there is no separate pin
//! detection. Castling and en passant are synthesized here because they
//! depend on history, then pass through the same [`GameState::valid_moves`]
//! gate as every other move before [`GameState::apply_move`] will play them.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──apply_move()──→ ... ──(checkmate | stalemate | resign())──→ game_over
//! ```
//!
//! Once `game_over` is set, `apply_move` and `resign` return
//! [`ChessError::GameOver`] and leave the state untouched.

use serde::{Deserialize, Serialize};

use crate::movegen::pseudo_legal_moves;
use crate::rules::{self, simulate};
use crate::{Board, ChessError, Color, Move, Piece, PieceType, Position};

/// Column the king starts on.
const KING_COL: u8 = 5;

// ---------------------------------------------------------------------------
// Castling rights
// ---------------------------------------------------------------------------

/// Which way a king castles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Column of the rook this side castles with.
    pub const fn rook_col(self) -> u8 {
        match self {
            Self::Kingside => 8,
            Self::Queenside => 1,
        }
    }

    /// Column the king lands on.
    pub const fn king_target_col(self) -> u8 {
        match self {
            Self::Kingside => 7,
            Self::Queenside => 3,
        }
    }

    /// Column the rook lands on.
    pub const fn rook_target_col(self) -> u8 {
        match self {
            Self::Kingside => 6,
            Self::Queenside => 4,
        }
    }

    /// Columns strictly between king and rook that must be empty.
    const fn between(self) -> &'static [u8] {
        match self {
            Self::Kingside => &[6, 7],
            Self::Queenside => &[2, 3, 4],
        }
    }

    /// Columns the king occupies while castling, start and end included.
    /// None of them may be attacked.
    const fn king_path(self) -> &'static [u8] {
        match self {
            Self::Kingside => &[5, 6, 7],
            Self::Queenside => &[5, 4, 3],
        }
    }
}

/// "Has it moved?" flags for one side's king and rooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideCastling {
    pub king_moved: bool,
    pub kingside_rook_moved: bool,
    pub queenside_rook_moved: bool,
}

impl SideCastling {
    fn rook_moved(&self, side: CastleSide) -> bool {
        match side {
            CastleSide::Kingside => self.kingside_rook_moved,
            CastleSide::Queenside => self.queenside_rook_moved,
        }
    }

    /// Marks the rook that started on `col` as gone, if `col` is a corner.
    fn rook_left(&mut self, col: u8) {
        match col {
            8 => self.kingside_rook_moved = true,
            1 => self.queenside_rook_moved = true,
            _ => {}
        }
    }
}

/// Castling bookkeeping for both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white: SideCastling,
    pub black: SideCastling,
}

impl CastlingRights {
    pub fn side(&self, color: Color) -> &SideCastling {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn side_mut(&mut self, color: Color) -> &mut SideCastling {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// What the position means for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Side to move has legal moves and is not in check.
    Ongoing,
    /// The given side is in check but can get out of it.
    Check(Color),
    /// The given side is in check with no legal move. It has lost.
    Checkmate(Color),
    /// The given side is not in check but has no legal move. Draw.
    Stalemate(Color),
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Full state of one chess game.
///
/// This is also the `game` payload of a `LOAD_GAME` message, so the field
/// names are camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    turn_color: Color,
    castling: CastlingRights,
    /// The pawn that just advanced two squares, capturable en passant for
    /// exactly one ply.
    en_passant_target: Option<Position>,
    game_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh game: standard position, white to move.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), Color::White)
    }

    /// A game starting from an arbitrary board. Castling rights are all
    /// intact and there is no en-passant target.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn_color: turn,
            castling: CastlingRights::default(),
            en_passant_target: None,
            game_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn_color
    }

    pub fn castling(&self) -> &CastlingRights {
        &self.castling
    }

    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant_target
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    // -- Check detection --------------------------------------------------

    pub fn is_in_check(&self, color: Color) -> bool {
        rules::is_in_check(&self.board, color)
    }

    /// Checks a pseudo-legal move for `color` by simulation.
    ///
    /// Covers ordinary moves and promotions only; castling and en passant
    /// are never pseudo-legal and are validated by their own rules.
    pub fn is_valid_move(&self, mv: &Move, color: Color) -> bool {
        let Some(piece) = self.board.get(mv.start) else {
            return false;
        };
        if piece.color != color || !pseudo_legal_moves(&self.board, mv.start).contains(mv) {
            return false;
        }
        !rules::is_in_check(&simulate(&self.board, mv, piece), color)
    }

    /// All legal moves for the piece on `pos`, including castling and en
    /// passant. Empty if the square is empty.
    ///
    /// This does not look at whose turn it is; [`apply_move`](Self::apply_move)
    /// enforces that.
    pub fn valid_moves(&self, pos: Position) -> Vec<Move> {
        let Some(piece) = self.board.get(pos) else {
            return Vec::new();
        };

        let mut moves: Vec<Move> = pseudo_legal_moves(&self.board, pos)
            .into_iter()
            .filter(|mv| self.is_valid_move(mv, piece.color))
            .collect();

        match piece.kind {
            PieceType::King if pos == Position::new(piece.color.home_row(), KING_COL) => {
                for side in [CastleSide::Kingside, CastleSide::Queenside] {
                    if self.can_castle(piece.color, side) {
                        let home = piece.color.home_row();
                        moves.push(Move::new(pos, Position::new(home, side.king_target_col())));
                    }
                }
            }
            PieceType::Pawn => moves.extend(self.en_passant_capture(pos, piece.color)),
            _ => {}
        }

        moves
    }

    // -- Castling ---------------------------------------------------------

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.can_castle(color, CastleSide::Kingside)
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.can_castle(color, CastleSide::Queenside)
    }

    /// Castling needs: king and rook unmoved and in place, nothing between
    /// them, and no square on the king's path (its current square included)
    /// attacked.
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        let rights = self.castling.side(color);
        if rights.king_moved || rights.rook_moved(side) {
            return false;
        }

        let home = color.home_row();
        let king_sq = Position::new(home, KING_COL);
        let rook_sq = Position::new(home, side.rook_col());
        if self.board.get(king_sq) != Some(Piece::new(color, PieceType::King))
            || self.board.get(rook_sq) != Some(Piece::new(color, PieceType::Rook))
        {
            return false;
        }

        if self.is_in_check(color) {
            return false;
        }

        if side.between().iter().any(|&col| !self.board.is_empty_at(Position::new(home, col))) {
            return false;
        }

        side.king_path().iter().all(|&col| {
            let mut trial = self.board;
            trial.set(king_sq, None);
            trial.set(Position::new(home, col), Some(Piece::new(color, PieceType::King)));
            !rules::is_in_check(&trial, color)
        })
    }

    // -- En passant -------------------------------------------------------

    /// The en-passant capture available to the pawn on `pos`, if any.
    fn en_passant_capture(&self, pos: Position, color: Color) -> Option<Move> {
        let target = self.en_passant_target?;
        if target.row() != pos.row() || target.col().abs_diff(pos.col()) != 1 {
            return None;
        }
        if self.board.get(target) != Some(Piece::new(color.opposite(), PieceType::Pawn)) {
            return None;
        }

        let landing = target.offset(color.forward(), 0)?;
        if !self.board.is_empty_at(landing) {
            return None;
        }

        let mut trial = self.board;
        trial.set(pos, None);
        trial.set(target, None);
        trial.set(landing, Some(Piece::new(color, PieceType::Pawn)));
        if rules::is_in_check(&trial, color) {
            return None;
        }

        Some(Move::new(pos, landing))
    }

    // -- Terminal states --------------------------------------------------

    /// Returns `true` if any piece of `color` has a legal move.
    pub fn has_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces_of(color)
            .any(|(pos, _)| !self.valid_moves(pos).is_empty())
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_legal_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_legal_move(color)
    }

    /// Classifies the position from the side to move's point of view.
    pub fn status(&self) -> GameStatus {
        let color = self.turn_color;
        match (self.is_in_check(color), self.has_legal_move(color)) {
            (true, false) => GameStatus::Checkmate(color),
            (false, false) => GameStatus::Stalemate(color),
            (true, true) => GameStatus::Check(color),
            (false, true) => GameStatus::Ongoing,
        }
    }

    // -- Transitions ------------------------------------------------------

    /// Plays `mv` for the side to move.
    ///
    /// Clears the start square and fills the end square (with the promoted
    /// piece if `mv.promotion` is set), moves the rook when castling,
    /// removes the captured pawn on en passant, updates castling rights and
    /// the en-passant target, and flips the turn. If the side now to move
    /// has no legal move, the game ends.
    ///
    /// # Errors
    /// - [`ChessError::GameOver`] if the game has ended
    /// - [`ChessError::NoPiece`] if `mv.start` is empty
    /// - [`ChessError::OutOfTurn`] if the piece belongs to the other side
    /// - [`ChessError::IllegalMove`] if `mv` is not in `valid_moves(mv.start)`
    pub fn apply_move(&mut self, mv: Move) -> Result<(), ChessError> {
        if self.game_over {
            return Err(ChessError::GameOver);
        }
        let piece = self.board.get(mv.start).ok_or(ChessError::NoPiece(mv.start))?;
        if piece.color != self.turn_color {
            return Err(ChessError::OutOfTurn {
                expected: self.turn_color,
                found: piece.color,
            });
        }
        if !self.valid_moves(mv.start).contains(&mv) {
            return Err(ChessError::IllegalMove(mv));
        }

        // Validation is done; nothing below can fail.
        let color = piece.color;
        let captured = self.board.get(mv.end);
        let home = color.home_row();

        self.board = simulate(&self.board, &mv, piece);

        match piece.kind {
            PieceType::King => {
                let side = match i16::from(mv.end.col()) - i16::from(mv.start.col()) {
                    2 => Some(CastleSide::Kingside),
                    -2 => Some(CastleSide::Queenside),
                    _ => None,
                };
                if let Some(side) = side {
                    let rook = self.board.get(Position::new(home, side.rook_col()));
                    self.board.set(Position::new(home, side.rook_col()), None);
                    self.board.set(Position::new(home, side.rook_target_col()), rook);
                }
                self.castling.side_mut(color).king_moved = true;
            }
            PieceType::Rook if mv.start.row() == home => {
                self.castling.side_mut(color).rook_left(mv.start.col());
            }
            PieceType::Pawn if mv.start.col() != mv.end.col() && captured.is_none() => {
                // Diagonal onto an empty square: en passant.
                self.board.set(Position::new(mv.start.row(), mv.end.col()), None);
            }
            _ => {}
        }

        let opponent = color.opposite();
        if captured == Some(Piece::new(opponent, PieceType::Rook))
            && mv.end.row() == opponent.home_row()
        {
            self.castling.side_mut(opponent).rook_left(mv.end.col());
        }

        let double_step = piece.kind == PieceType::Pawn && mv.start.row().abs_diff(mv.end.row()) == 2;
        self.en_passant_target = double_step.then_some(mv.end);

        self.turn_color = opponent;
        if !self.has_legal_move(opponent) {
            self.game_over = true;
        }

        Ok(())
    }

    /// Ends the game by resignation. Board state is irrelevant.
    ///
    /// # Errors
    /// [`ChessError::GameOver`] if the game already ended.
    pub fn resign(&mut self) -> Result<(), ChessError> {
        if self.game_over {
            return Err(ChessError::GameOver);
        }
        self.game_over = true;
        Ok(())
    }
}
