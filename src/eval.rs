//! Static evaluation.
//!
//! The search only needs a score for a position; it reaches the scoring
//! function through the `Evaluator` trait so callers can plug in their own.
//! `SimplifiedEvaluator` is a small material plus piece-square evaluator
//! good enough to play sensible chess and to drive the tests.

use crate::board::{Board, Color, Piece};

/// Scores a position in centipawns, positive when white is better.
///
/// `alpha` and `beta` are the window of the caller, already translated to
/// white's point of view; evaluators may use them for lazy cut-offs.
/// Implementations must depend only on the board so cached evaluations
/// stay valid.
pub trait Evaluator {
    fn evaluate(&self, board: &Board, alpha: i32, beta: i32) -> i32;
}

impl<F> Evaluator for F
where
    F: Fn(&Board) -> i32,
{
    fn evaluate(&self, board: &Board, _alpha: i32, _beta: i32) -> i32 {
        self(board)
    }
}

/// Material values by piece index (pawn .. king)
const MATERIAL: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Non-pawn material (both sides) at or below which the king table switches
/// to its endgame form
const ENDGAME_MATERIAL: i32 = 2 * 500 + 2 * 330;

// Piece-square tables from white's side, a1 first (index = rank * 8 + file).
// Black pieces read the table with the square mirrored vertically.

#[rustfmt::skip]
const PAWN_PST: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10, -20, -20,  10,  10,   5,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,   5,  10,  25,  25,  10,   5,   5,
     10,  10,  20,  30,  30,  20,  10,  10,
     50,  50,  50,  50,  50,  50,  50,  50,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_PST: [i32; 64] = [
      0,   0,   0,   5,   5,   0,   0,   0,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      5,  10,  10,  10,  10,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_PST: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -10,   5,   5,   5,   5,   5,   0, -10,
      0,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MG_PST: [i32; 64] = [
     20,  30,  10,   0,   0,  10,  30,  20,
     20,  20,   0,   0,   0,   0,  20,  20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

#[rustfmt::skip]
const KING_EG_PST: [i32; 64] = [
    -50, -30, -30, -30, -30, -30, -30, -50,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -50, -40, -30, -20, -20, -30, -40, -50,
];

/// Material and piece-square tables, with separate king tables for the
/// middlegame and the endgame.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimplifiedEvaluator;

impl SimplifiedEvaluator {
    #[must_use]
    pub fn new() -> Self {
        SimplifiedEvaluator
    }

    fn is_endgame(board: &Board) -> bool {
        if board.piece_bb(Piece::Queen).is_empty() {
            return true;
        }
        let non_pawn: i32 = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
            .into_iter()
            .map(|p| board.piece_bb(p).popcount() as i32 * MATERIAL[p.index()])
            .sum();
        non_pawn - 2 * MATERIAL[Piece::Queen.index()] <= ENDGAME_MATERIAL
    }

    fn side_score(board: &Board, color: Color, endgame: bool) -> i32 {
        let mut score = 0;
        for piece in Piece::ALL {
            let table = match piece {
                Piece::Pawn => &PAWN_PST,
                Piece::Knight => &KNIGHT_PST,
                Piece::Bishop => &BISHOP_PST,
                Piece::Rook => &ROOK_PST,
                Piece::Queen => &QUEEN_PST,
                Piece::King if endgame => &KING_EG_PST,
                Piece::King => &KING_MG_PST,
            };
            for sq in board.pieces_of(color, piece) {
                let idx = match color {
                    Color::White => sq.index(),
                    Color::Black => sq.index() ^ 56,
                };
                score += MATERIAL[piece.index()] + table[idx];
            }
        }
        score
    }
}

impl Evaluator for SimplifiedEvaluator {
    fn evaluate(&self, board: &Board, _alpha: i32, _beta: i32) -> i32 {
        let endgame = Self::is_endgame(board);
        Self::side_score(board, Color::White, endgame) - Self::side_score(board, Color::Black, endgame)
    }
}
