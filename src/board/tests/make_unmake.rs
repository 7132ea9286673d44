//! Make/unmake move tests.

use crate::board::{Board, Color, Move, Piece, Square};
use rand::prelude::*;

fn find_move(board: &mut Board, from: Square, to: Square, promotion: Option<Piece>) -> Move {
    for m in board.legal_moves().iter() {
        if m.from() == from && m.to() == to && m.promotion() == promotion {
            return *m;
        }
    }
    panic!("Expected move not found");
}

#[test]
fn test_en_passant_make_unmake() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    let original_key = board.key();
    let original_ep = board.en_passant_square();
    let mv = find_move(&mut board, Square::new(4, 4), Square::new(5, 5), None);
    assert!(mv.is_en_passant());
    assert!(board.do_move(mv));
    assert_eq!(board.piece_at(Square::new(4, 5)), None);
    assert_eq!(board.last_captured_piece(), Some(Piece::Pawn));
    board.undo_move();
    assert_eq!(board.key(), original_key);
    assert_eq!(board.en_passant_square(), original_ep);
    assert_eq!(
        board.piece_at(Square::new(4, 5)),
        Some((Color::Black, Piece::Pawn))
    );
}

#[test]
fn test_promotion_make_unmake() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let original_key = board.key();
    let mv = find_move(
        &mut board,
        Square::new(6, 0),
        Square::new(7, 0),
        Some(Piece::Queen),
    );
    assert!(board.do_move(mv));
    assert_eq!(
        board.piece_at(Square::new(7, 0)),
        Some((Color::White, Piece::Queen))
    );
    board.undo_move();
    assert_eq!(board.key(), original_key);
    assert_eq!(
        board.piece_at(Square::new(6, 0)),
        Some((Color::White, Piece::Pawn))
    );
}

#[test]
fn test_castling_moves_the_rook() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let fen = board.to_fen();
    let mv = find_move(&mut board, Square::E1, Square::G1, None);
    assert!(mv.is_castling());
    assert!(board.do_move(mv));
    assert_eq!(board.piece_at(Square::F1), Some((Color::White, Piece::Rook)));
    assert_eq!(board.piece_at(Square::H1), None);
    assert!(!board.castling_rights().has(Color::White, true));
    assert!(!board.castling_rights().has(Color::White, false));
    board.undo_move();
    assert_eq!(board.to_fen(), fen);
}

#[test]
fn test_illegal_move_is_rolled_back() {
    // The knight on d2 is pinned against the king by the bishop on b4
    let mut board = Board::from_fen("4k3/8/8/8/1b6/8/3N4/4K3 w - - 0 1").unwrap();
    let fen = board.to_fen();
    let pinned = board
        .pseudo_legal_moves()
        .iter()
        .copied()
        .find(|m| m.from() == Square::new(1, 3))
        .unwrap();
    assert!(!board.do_move(pinned));
    assert_eq!(board.ply(), 0);
    assert_eq!(board.to_fen(), fen);
}

#[test]
fn test_null_move_make_unmake_restores_key_and_ep() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
    let original_key = board.key();
    let original_ep = board.en_passant_square();
    let original_side = board.side_to_move();

    board.do_null_move();
    assert_eq!(board.en_passant_square(), None);
    assert_ne!(board.key(), original_key);
    assert_ne!(board.side_to_move(), original_side);
    assert_eq!(board.key(), board.recompute_key());
    assert!(board.last_move().is_none());

    board.undo_move();
    assert_eq!(board.key(), original_key);
    assert_eq!(board.en_passant_square(), original_ep);
    assert_eq!(board.side_to_move(), original_side);
}

#[test]
fn test_null_move_preserves_castling_rights() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let original_castling = board.castling_rights();
    board.do_null_move();
    assert_eq!(board.castling_rights(), original_castling);
    board.undo_move();
    assert_eq!(board.castling_rights(), original_castling);
}

#[test]
fn test_legal_moves_stable_after_make_unmake() {
    let mut board = Board::new();
    let initial_moves = board.legal_moves();
    let mut initial_list: Vec<String> = initial_moves.iter().map(|m| m.to_string()).collect();
    initial_list.sort();

    for mv in initial_moves.iter() {
        assert!(board.do_move(*mv));
        board.undo_move();
    }

    let after_moves = board.legal_moves();
    let mut after_list: Vec<String> = after_moves.iter().map(|m| m.to_string()).collect();
    after_list.sort();

    assert_eq!(initial_list, after_list);
}

#[test]
fn test_key_matches_recompute_after_random_moves() {
    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut keys = Vec::new();

    for _ in 0..50 {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..moves.len());
        let mv = moves.as_slice()[idx];
        keys.push(board.key());
        assert!(board.do_move(mv));
        assert_eq!(board.key(), board.recompute_key());
    }

    while let Some(key) = keys.pop() {
        board.undo_move();
        assert_eq!(board.key(), key);
        assert_eq!(board.key(), board.recompute_key());
    }
}

#[test]
fn test_undo_to_returns_to_an_earlier_ply() {
    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let initial_fen = board.to_fen();
    let mut fen_at_10 = String::new();

    for i in 0..40 {
        if i == 10 {
            fen_at_10 = board.to_fen();
        }
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves.as_slice()[rng.gen_range(0..moves.len())];
        board.do_move(mv);
    }

    board.undo_to(10);
    assert_eq!(board.ply(), 10);
    assert_eq!(board.to_fen(), fen_at_10);
    board.undo_to(0);
    assert_eq!(board.to_fen(), initial_fen);
    assert_eq!(board.fifty_move_counter(), 0);
}
