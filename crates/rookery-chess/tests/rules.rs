//! Rules-engine tests against hand-built positions.

use rookery_chess::{
    pseudo_legal_moves, Board, ChessError, Color, GameState, GameStatus, Move, Piece, PieceType,
    Position,
};

fn sq(s: &str) -> Position {
    s.parse().unwrap()
}

fn mv(from: &str, to: &str) -> Move {
    Move::new(sq(from), sq(to))
}

fn board_with(pieces: &[(&str, Color, PieceType)]) -> Board {
    let mut board = Board::empty();
    for &(at, color, kind) in pieces {
        board.set(sq(at), Some(Piece::new(color, kind)));
    }
    board
}

fn play(game: &mut GameState, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        game.apply_move(mv(from, to))
            .unwrap_or_else(|e| panic!("{from}-{to} rejected: {e}"));
    }
}

// ---------------------------------------------------------------------------
// Generation properties
// ---------------------------------------------------------------------------

#[test]
fn test_every_generated_move_stays_on_the_board() {
    let kinds = [
        PieceType::King,
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Pawn,
    ];

    for color in Color::ALL {
        for kind in kinds {
            for from in Position::all() {
                let mut board = Board::empty();
                board.set(from, Some(Piece::new(color, kind)));

                for m in pseudo_legal_moves(&board, from) {
                    assert!((1..=8).contains(&m.end.row()), "{kind} {color} {m}");
                    assert!((1..=8).contains(&m.end.col()), "{kind} {color} {m}");
                    assert_eq!(m.start, from);
                }
            }
        }
    }
}

#[test]
fn test_valid_moves_is_idempotent() {
    let mut game = GameState::new();
    play(&mut game, &[("e2", "e4"), ("d7", "d5"), ("g1", "f3")]);
    let before = game.clone();

    for pos in Position::all() {
        assert_eq!(game.valid_moves(pos), game.valid_moves(pos), "at {pos}");
    }
    assert_eq!(game, before);
}

#[test]
fn test_pinned_piece_cannot_move_off_the_pin() {
    let board = board_with(&[
        ("e1", Color::White, PieceType::King),
        ("e2", Color::White, PieceType::Knight),
        ("e8", Color::Black, PieceType::Rook),
        ("a8", Color::Black, PieceType::King),
    ]);
    let game = GameState::from_board(board, Color::White);

    assert!(game.valid_moves(sq("e2")).is_empty());
}

// ---------------------------------------------------------------------------
// Terminal states
// ---------------------------------------------------------------------------

fn back_rank_setup() -> GameState {
    let board = board_with(&[
        ("g8", Color::Black, PieceType::King),
        ("f7", Color::Black, PieceType::Pawn),
        ("g7", Color::Black, PieceType::Pawn),
        ("h7", Color::Black, PieceType::Pawn),
        ("d1", Color::White, PieceType::Rook),
        ("e7", Color::White, PieceType::Queen),
        ("a1", Color::White, PieceType::King),
    ]);
    GameState::from_board(board, Color::White)
}

#[test]
fn test_back_rank_mate_is_checkmate() {
    let mut game = back_rank_setup();
    assert!(!game.is_in_checkmate(Color::Black));

    play(&mut game, &[("d1", "d8")]);

    assert!(game.is_in_check(Color::Black));
    assert!(game.is_in_checkmate(Color::Black));
    assert!(!game.is_in_stalemate(Color::Black));
    for (pos, _) in game.board().pieces_of(Color::Black) {
        assert!(game.valid_moves(pos).is_empty(), "{pos} still has moves");
    }
    assert_eq!(game.status(), GameStatus::Checkmate(Color::Black));
    assert!(game.is_over());
}

#[test]
fn test_no_moves_accepted_after_checkmate() {
    let mut game = back_rank_setup();
    play(&mut game, &[("d1", "d8")]);

    assert_eq!(game.apply_move(mv("g8", "h8")), Err(ChessError::GameOver));
}

#[test]
fn test_cornered_king_without_moves_is_stalemate() {
    let board = board_with(&[
        ("a8", Color::Black, PieceType::King),
        ("c2", Color::White, PieceType::Queen),
        ("h1", Color::White, PieceType::King),
    ]);
    let mut game = GameState::from_board(board, Color::White);

    play(&mut game, &[("c2", "c7")]);

    assert!(!game.is_in_check(Color::Black));
    assert!(game.is_in_stalemate(Color::Black));
    assert!(!game.is_in_checkmate(Color::Black));
    assert_eq!(game.status(), GameStatus::Stalemate(Color::Black));
    assert!(game.is_over());
}

// ---------------------------------------------------------------------------
// En passant
// ---------------------------------------------------------------------------

/// Black pawn on d4, white about to play e2-e4 beside it.
fn en_passant_setup() -> GameState {
    let mut game = GameState::new();
    play(
        &mut game,
        &[("a2", "a3"), ("d7", "d5"), ("a3", "a4"), ("d5", "d4")],
    );
    game
}

#[test]
fn test_en_passant_available_right_after_double_step() {
    let mut game = en_passant_setup();
    play(&mut game, &[("e2", "e4")]);

    assert!(game.valid_moves(sq("d4")).contains(&mv("d4", "e3")));

    play(&mut game, &[("d4", "e3")]);

    assert!(game.board().is_empty_at(sq("e4")), "captured pawn removed");
    assert_eq!(
        game.board().get(sq("e3")),
        Some(Piece::new(Color::Black, PieceType::Pawn))
    );
    assert_eq!(game.en_passant_target(), None);
}

#[test]
fn test_en_passant_expires_after_intervening_move() {
    let mut game = en_passant_setup();
    play(&mut game, &[("e2", "e4"), ("h7", "h6"), ("h2", "h3")]);

    assert!(!game.valid_moves(sq("d4")).contains(&mv("d4", "e3")));
    assert_eq!(
        game.apply_move(mv("d4", "e3")),
        Err(ChessError::IllegalMove(mv("d4", "e3")))
    );
}

#[test]
fn test_en_passant_exposing_own_king_is_rejected() {
    // Taking e4 en passant would empty the fourth rank between the rook
    // on h4 and the king on a4.
    let board = board_with(&[
        ("a4", Color::Black, PieceType::King),
        ("d4", Color::Black, PieceType::Pawn),
        ("e2", Color::White, PieceType::Pawn),
        ("h4", Color::White, PieceType::Rook),
        ("h1", Color::White, PieceType::King),
    ]);
    let mut game = GameState::from_board(board, Color::White);
    play(&mut game, &[("e2", "e4")]);

    assert_eq!(game.en_passant_target(), Some(sq("e4")));
    assert_eq!(game.valid_moves(sq("d4")), vec![mv("d4", "d3")]);
    assert_eq!(
        game.apply_move(mv("d4", "e3")),
        Err(ChessError::IllegalMove(mv("d4", "e3")))
    );
    assert_eq!(
        game.board().get(sq("e4")),
        Some(Piece::new(Color::White, PieceType::Pawn))
    );
}

#[test]
fn test_single_step_does_not_open_en_passant() {
    let mut game = en_passant_setup();
    play(&mut game, &[("e2", "e3"), ("h7", "h6"), ("e3", "e4")]);

    // e3-e4 lands beside d4 but was not a double step.
    assert_eq!(game.en_passant_target(), None);
}

// ---------------------------------------------------------------------------
// Promotion
// ---------------------------------------------------------------------------

fn promotion_setup() -> GameState {
    let board = board_with(&[
        ("a7", Color::White, PieceType::Pawn),
        ("e1", Color::White, PieceType::King),
        ("h5", Color::Black, PieceType::King),
    ]);
    GameState::from_board(board, Color::White)
}

#[test]
fn test_promotion_without_piece_is_rejected() {
    let mut game = promotion_setup();
    let before = game.clone();

    assert_eq!(
        game.apply_move(mv("a7", "a8")),
        Err(ChessError::IllegalMove(mv("a7", "a8")))
    );
    assert_eq!(game, before);
}

#[test]
fn test_each_promotion_piece_is_a_distinct_legal_move() {
    let game = promotion_setup();
    let moves = game.valid_moves(sq("a7"));

    assert_eq!(moves.len(), 4);
    for kind in PieceType::PROMOTIONS {
        assert!(moves.contains(&Move::promoting(sq("a7"), sq("a8"), kind)));
    }
}

#[test]
fn test_promotion_replaces_the_pawn() {
    for kind in PieceType::PROMOTIONS {
        let mut game = promotion_setup();
        game.apply_move(Move::promoting(sq("a7"), sq("a8"), kind)).unwrap();

        assert_eq!(game.board().get(sq("a8")), Some(Piece::new(Color::White, kind)));
        assert!(game.board().is_empty_at(sq("a7")));
    }
}

// ---------------------------------------------------------------------------
// Castling
// ---------------------------------------------------------------------------

fn castling_setup(extra: &[(&str, Color, PieceType)]) -> GameState {
    let mut pieces = vec![
        ("e1", Color::White, PieceType::King),
        ("h1", Color::White, PieceType::Rook),
        ("a1", Color::White, PieceType::Rook),
        ("e8", Color::Black, PieceType::King),
    ];
    pieces.extend_from_slice(extra);
    GameState::from_board(board_with(&pieces), Color::White)
}

#[test]
fn test_kingside_castling_moves_king_and_rook() {
    let mut game = castling_setup(&[]);
    assert!(game.can_castle_kingside(Color::White));
    assert!(game.valid_moves(sq("e1")).contains(&mv("e1", "g1")));

    play(&mut game, &[("e1", "g1")]);

    assert_eq!(
        game.board().get(sq("g1")),
        Some(Piece::new(Color::White, PieceType::King))
    );
    assert_eq!(
        game.board().get(sq("f1")),
        Some(Piece::new(Color::White, PieceType::Rook))
    );
    assert!(game.board().is_empty_at(sq("h1")));
    assert!(game.castling().side(Color::White).king_moved);
}

#[test]
fn test_queenside_castling_moves_king_and_rook() {
    let mut game = castling_setup(&[]);
    play(&mut game, &[("e1", "c1")]);

    assert_eq!(
        game.board().get(sq("c1")),
        Some(Piece::new(Color::White, PieceType::King))
    );
    assert_eq!(
        game.board().get(sq("d1")),
        Some(Piece::new(Color::White, PieceType::Rook))
    );
    assert!(game.board().is_empty_at(sq("a1")));
}

#[test]
fn test_castling_illegal_after_king_moved_and_returned() {
    let mut game = castling_setup(&[]);
    play(
        &mut game,
        &[("e1", "f1"), ("e8", "d8"), ("f1", "e1"), ("d8", "e8")],
    );

    assert!(!game.can_castle_kingside(Color::White));
    assert!(!game.can_castle_queenside(Color::White));
    assert_eq!(
        game.apply_move(mv("e1", "g1")),
        Err(ChessError::IllegalMove(mv("e1", "g1")))
    );
}

#[test]
fn test_castling_illegal_after_rook_moved_and_returned() {
    let mut game = castling_setup(&[]);
    play(
        &mut game,
        &[("h1", "h2"), ("e8", "d8"), ("h2", "h1"), ("d8", "e8")],
    );

    assert!(!game.can_castle_kingside(Color::White));
    assert!(game.can_castle_queenside(Color::White));
}

#[test]
fn test_castling_illegal_through_attacked_square() {
    let game = castling_setup(&[("f8", Color::Black, PieceType::Rook)]);

    assert!(!game.can_castle_kingside(Color::White));
    assert!(!game.valid_moves(sq("e1")).contains(&mv("e1", "g1")));
}

#[test]
fn test_castling_illegal_while_in_check() {
    let board = board_with(&[
        ("e1", Color::White, PieceType::King),
        ("h1", Color::White, PieceType::Rook),
        ("e7", Color::Black, PieceType::Rook),
        ("a8", Color::Black, PieceType::King),
    ]);
    let game = GameState::from_board(board, Color::White);

    assert!(game.is_in_check(Color::White));
    assert!(!game.can_castle_kingside(Color::White));
}

#[test]
fn test_castling_illegal_with_piece_between() {
    let game = castling_setup(&[("g1", Color::White, PieceType::Knight)]);
    assert!(!game.can_castle_kingside(Color::White));
}

#[test]
fn test_queenside_castling_ignores_attack_on_b_file() {
    // b1 is crossed by the rook, not the king.
    let game = castling_setup(&[("b8", Color::Black, PieceType::Rook)]);
    assert!(game.can_castle_queenside(Color::White));
}
