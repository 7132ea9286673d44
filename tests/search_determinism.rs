//! Fixed-depth searches must not depend on anything but the position,
//! the configuration and the seed.

use carbon_chess::board::{Board, GameState};
use carbon_chess::search::{SearchConfig, SearchEngine, SearchParams};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

fn engine(config: SearchConfig, seed: u64) -> SearchEngine {
    let mut engine = SearchEngine::new(config);
    engine.set_seed(seed);
    engine
}

fn config() -> SearchConfig {
    SearchConfig {
        transposition_table_size: 8,
        ..SearchConfig::default()
    }
}

#[test]
fn same_position_same_result() {
    for fen in POSITIONS {
        let mut runs = Vec::new();
        for _ in 0..2 {
            let mut e = engine(config(), 1);
            e.set_fen(fen).unwrap();
            let result = e.go(&SearchParams::depth(5));
            runs.push((result, e.stats().nodes));
        }
        assert_eq!(runs[0], runs[1], "{fen}");
    }
}

#[test]
fn new_game_forgets_the_previous_search() {
    let mut reused = engine(config(), 1);
    reused.set_fen(POSITIONS[2]).unwrap();
    reused.go(&SearchParams::depth(4));

    reused.new_game();
    reused.set_fen(POSITIONS[1]).unwrap();
    let second = reused.go(&SearchParams::depth(5));
    let second_nodes = reused.stats().nodes;

    let mut fresh = engine(config(), 1);
    fresh.set_fen(POSITIONS[1]).unwrap();
    let first = fresh.go(&SearchParams::depth(5));
    assert_eq!(first, second);
    assert_eq!(fresh.stats().nodes, second_nodes);
}

#[test]
fn randomised_play_is_reproducible_from_the_seed() {
    let randomised = SearchConfig {
        rand: 30,
        ..config()
    };
    let play = |seed: u64| {
        let mut e = engine(randomised.clone(), seed);
        let mut line = Vec::new();
        for _ in 0..6 {
            let result = e.go(&SearchParams::depth(3));
            let mv = result.best_move.unwrap();
            line.push(mv.to_uci());
            assert!(e.board_mut().do_move(mv));
        }
        line
    };
    assert_eq!(play(42), play(42));
}

#[test]
fn search_leaves_the_position_unchanged_and_plays_legal_moves() {
    for fen in POSITIONS {
        let mut e = engine(config(), 7);
        e.set_fen(fen).unwrap();
        let result = e.go(&SearchParams::depth(4));
        assert_eq!(e.board().to_fen(), Board::from_fen(fen).unwrap().to_fen());

        let mut board = Board::from_fen(fen).unwrap();
        let best = result.best_move.unwrap();
        assert!(board.legal_moves().contains(best), "{fen}: {best}");
        if let Some(ponder) = result.ponder_move {
            board.do_move(best);
            assert!(board.legal_moves().contains(ponder), "{fen}: {best} {ponder}");
        }
    }
}

#[test]
fn self_play_reaches_a_sane_state() {
    let mut e = engine(config(), 3);
    for _ in 0..20 {
        let state = e.board_mut().is_endgame();
        if state != GameState::Ongoing {
            break;
        }
        let result = e.go(&SearchParams::depth(3));
        let mv = result.best_move.unwrap();
        assert!(e.board_mut().do_move(mv));
    }
    assert_eq!(e.board().key(), e.board().recompute_key());
}

#[test]
fn avoids_hanging_the_queen() {
    let mut e = engine(config(), 1);
    e.set_fen("r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3")
        .unwrap();
    let best = e.go(&SearchParams::depth(4)).best_move.unwrap();
    assert_ne!(best.to_uci(), "f3c6");
    assert_ne!(best.to_uci(), "f3f7");
}
