//! Edge case tests for special chess positions and moves.

use crate::board::{
    Board, Color, FenError, GameState, GenType, Move, MoveList, Piece, Square, TYPE_NORMAL,
    TYPE_PROMOTION_QUEEN,
};

#[test]
fn test_stalemate_position() {
    let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(!board.in_check());
    assert_eq!(board.is_endgame(), GameState::Stalemate);
    assert!(board.legal_moves().is_empty());
}

#[test]
fn test_every_underpromotion_is_generated() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let moves = board.legal_moves();
    for piece in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
        assert!(
            moves.iter().any(|m| m.promotion() == Some(piece)),
            "{piece:?} promotion should be available"
        );
    }

    let knight = moves
        .iter()
        .copied()
        .find(|m| m.promotion() == Some(Piece::Knight))
        .unwrap();
    board.do_move(knight);
    assert_eq!(
        board.piece_at(Square::new(7, 0)),
        Some((Color::White, Piece::Knight))
    );
}

#[test]
fn test_generation_types_partition_the_moves() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    ];
    for fen in fens {
        let board = Board::from_fen(fen).unwrap();
        let mut tactical = MoveList::new();
        let mut quiet = MoveList::new();
        board.generate_moves(GenType::Tactical, &mut tactical);
        board.generate_moves(GenType::Quiet, &mut quiet);
        let all = board.pseudo_legal_moves();
        assert_eq!(tactical.len() + quiet.len(), all.len(), "{fen}");
        for mv in tactical.iter() {
            assert!(mv.is_capture() || mv.promotion() == Some(Piece::Queen), "{mv}");
            assert!(!quiet.contains(*mv));
        }
    }
}

#[test]
fn test_capturing_underpromotion_is_pseudo_legal() {
    let mut board = Board::from_fen("5rbr/4P1pk/6pp/8/8/8/8/K7 w - - 0 1").unwrap();
    let knight = board.parse_uci("e7f8n").unwrap();
    assert!(knight.is_capture());
    assert!(board.is_pseudo_legal(knight));
    for promo in ["e7f8q", "e7f8r", "e7f8b"] {
        let mv = board.parse_uci(promo).unwrap();
        assert!(board.is_pseudo_legal(mv), "{promo}");
    }
    assert_eq!(board.to_san(knight), "exf8=N#");
    board.do_move(knight);
    assert_eq!(board.is_endgame(), GameState::Checkmate);
}

#[test]
fn test_en_passant_removes_correct_pawn() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1").unwrap();
    let moves = board.legal_moves();

    let ep_move = moves.iter().copied().find(|m| m.is_en_passant());
    assert!(ep_move.is_some(), "En passant should be available");

    board.do_move(ep_move.unwrap());
    assert!(
        board.piece_at(Square::new(4, 3)).is_none(),
        "Captured pawn should be removed"
    );
    assert_eq!(
        board.piece_at(Square::new(5, 3)),
        Some((Color::White, Piece::Pawn)),
        "Capturing pawn should be on d6"
    );

    board.undo_move();
    assert_eq!(
        board.piece_at(Square::new(4, 3)),
        Some((Color::Black, Piece::Pawn)),
        "Black pawn should be restored"
    );
    assert_eq!(
        board.piece_at(Square::new(4, 4)),
        Some((Color::White, Piece::Pawn)),
        "White pawn should be back on e5"
    );
}

#[test]
fn test_castling_blocked_by_check() {
    let mut board = Board::from_fen("r3k2r/8/8/8/4Q3/8/8/R3K2R b KQkq - 0 1").unwrap();
    let moves = board.legal_moves();
    assert!(
        !moves.iter().any(|m| m.is_castling()),
        "Castling should not be available when in check"
    );
}

#[test]
fn test_castling_through_attacked_square() {
    // The rook on f8 covers f1, so only the queenside castle is allowed
    let mut board = Board::from_fen("r4rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let castles: Vec<Move> = board
        .legal_moves()
        .iter()
        .copied()
        .filter(|m| m.is_castling())
        .collect();
    assert_eq!(castles.len(), 1);
    assert_eq!(castles[0].to(), Square::C1);
}

#[test]
fn test_double_check_only_king_can_move() {
    let mut board = Board::from_fen("4k3/8/8/1b6/8/8/3r4/3K4 w - - 0 1").unwrap();
    let moves = board.legal_moves();
    assert!(!moves.is_empty());
    for mv in moves.iter() {
        assert_eq!(
            mv.from(),
            Square::new(0, 3),
            "Only king should be able to move in double check"
        );
    }
}

#[test]
fn test_checkmate_back_rank() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let mate = board.parse_uci("a1a8").unwrap();
    assert!(board.do_move(mate));
    assert!(board.in_check());
    assert_eq!(board.is_endgame(), GameState::Checkmate);
}

#[test]
fn test_passed_pawns() {
    let board = Board::from_fen("4k3/8/8/1p6/P7/8/5P2/4K3 w - - 0 1").unwrap();
    // The b5 pawn guards a4's path
    assert!(!board.is_passed_pawn(Square::new(3, 0)));
    assert!(board.is_passed_pawn(Square::new(1, 5)));
    assert!(!board.is_passed_pawn(Square::new(4, 1)));
    assert!(!board.is_passed_pawn(Square::E1));
}

#[test]
fn test_fen_parsing_errors() {
    assert!(matches!(
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        Err(FenError::WrongRankCount { found: 7 })
    ));
    assert!(matches!(
        Board::from_fen("rnbxkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        Err(FenError::InvalidPiece { char: 'x' })
    ));
    assert!(matches!(
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
        Err(FenError::InvalidSideToMove { .. })
    ));
    assert!(Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XYZ - 0 1").is_err());
    assert!(matches!(
        Board::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
        Err(FenError::KingCount { color: 'b', found: 0 })
    ));
    assert!(matches!(Board::from_fen(""), Err(FenError::Empty)));
}

#[test]
fn test_failed_set_fen_keeps_position() {
    let mut board = Board::new();
    board.play_uci("e2e4").unwrap();
    let fen = board.to_fen();
    assert!(board.set_fen("not a fen").is_err());
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.ply(), 1);
}

#[test]
fn test_square_parsing() {
    use std::str::FromStr;

    assert_eq!(Square::from_str("a1").unwrap(), Square::new(0, 0));
    assert_eq!(Square::from_str("h8").unwrap(), Square::new(7, 7));
    assert_eq!(Square::from_str("e4").unwrap(), Square::new(3, 4));

    assert!(Square::from_str("i1").is_err());
    assert!(Square::from_str("a9").is_err());
    assert!(Square::from_str("").is_err());
    assert!(Square::from_str("a").is_err());
}

#[test]
fn test_square_try_from() {
    assert!(Square::try_from((0, 0)).is_ok());
    assert!(Square::try_from((7, 7)).is_ok());
    assert!(Square::try_from((8, 0)).is_err());
    assert!(Square::try_from((0, 8)).is_err());
}

#[test]
fn test_move_encoding() {
    let push = Move::new(Square::new(1, 4), Square::new(3, 4), Piece::Pawn, false, TYPE_NORMAL);
    assert!(!push.is_tactical());
    assert!(!push.is_pawn_push_678());
    assert_eq!(push.piece(), Piece::Pawn);
    assert_eq!(push.to_uci(), "e2e4");

    let promo = Move::new(
        Square::new(6, 0),
        Square::new(7, 1),
        Piece::Pawn,
        true,
        TYPE_PROMOTION_QUEEN,
    );
    assert!(promo.is_capture());
    assert!(promo.is_promotion());
    assert!(promo.is_tactical());
    assert!(promo.is_pawn_push_678());
    assert_eq!(promo.promotion(), Some(Piece::Queen));
    assert_eq!(promo.to_uci(), "a7b8q");

    assert_eq!(Move::NONE.to_uci(), "0000");
    assert!(Move::NONE.is_none());
}

#[test]
fn test_movelist_index() {
    let mut board = Board::new();
    let moves = board.legal_moves();
    assert_eq!(moves[0], moves.as_slice()[0]);
}

#[test]
fn test_board_from_str() {
    let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        .parse()
        .unwrap();
    assert_eq!(board.side_to_move(), Color::White);

    let result: Result<Board, _> = "invalid fen".parse();
    assert!(result.is_err());
}
