//! Quiescence search: tactical moves only, until the position is quiet.

use crate::board::{Move, Piece};
use crate::tt::BoundType;

use super::constants::{value_mate_in, value_mated_in, MATE, MAX_DEPTH, PIECE_VALUES};
use super::engine::{SearchAborted, SearchEngine};
use super::move_order::Phase;

/// Table depth of a quiescence result, below any main search depth. Results
/// that looked at quiet checks rank above those that did not.
const TT_DEPTH_QS_CHECKS: i32 = 1;
const TT_DEPTH_QS_NO_CHECKS: i32 = 0;

impl SearchEngine {
    /// Stand pat on the static evaluation when not in check, then try
    /// captures and queen promotions. At the first quiescence ply of a PV
    /// node quiet checks are tried too; in check every evasion is.
    pub(super) fn quiescence(
        &mut self,
        qs_depth: usize,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, SearchAborted> {
        self.check_abort()?;
        self.stats.nodes += 1;
        self.stats.qs_nodes += 1;

        if self.board.is_draw() {
            return Ok(self.evaluate_draw());
        }

        let ply = self.ply();
        // Mate distance pruning
        alpha = alpha.max(value_mated_in(ply));
        let beta = beta.min(value_mate_in(ply + 1));
        if alpha >= beta {
            return Ok(alpha);
        }
        let alpha0 = alpha;

        let pv = beta - alpha > 1;
        let generate_checks = pv && qs_depth == 0;
        let tt_depth = if generate_checks {
            TT_DEPTH_QS_CHECKS
        } else {
            TT_DEPTH_QS_NO_CHECKS
        };
        let key = self.board.tt_key(false);
        self.stats.tt_probes += 1;
        let entry = self.tt.probe(key, ply);
        if let Some(e) = entry {
            self.stats.tt_hits += 1;
            if !pv && self.can_use_tt(&e, tt_depth, alpha, beta) {
                self.stats.tt_cutoffs += 1;
                return Ok(e.score);
            }
        }

        let in_check = self.board.in_check();
        let mut eval = -MATE;
        if !in_check {
            eval = self.eval(alpha, beta, key, entry.as_ref(), true);
            if eval >= beta {
                if entry.is_none() {
                    self.tt
                        .store(key, BoundType::FailHigh, tt_depth, Move::NONE, eval, ply);
                }
                return Ok(eval);
            }
            alpha = alpha.max(eval);
        }

        if ply >= MAX_DEPTH {
            log::trace!("quiescence reached ply {ply} at qs depth {qs_depth}");
            return Ok(if in_check {
                self.eval(alpha, beta, key, entry.as_ref(), false)
            } else {
                eval
            });
        }

        let mut valid = false;
        let mut best_move = Move::NONE;
        self.iterators[ply].reset_quiescence(&self.board, &self.sort_info, generate_checks);
        while let Some(mv) = self.iterators[ply].next(&self.board, &self.sort_info) {
            if !self.board.do_move(mv) {
                continue;
            }
            valid = true;
            let gives_check = self.board.in_check();

            if !gives_check
                && !in_check
                && !mv.is_promotion()
                && !mv.is_pawn_push_678()
                && !pv
                && self.defender_has_material()
            {
                let captured = self
                    .board
                    .last_captured_piece()
                    .map_or(0, |p| PIECE_VALUES[p.index()]);
                if eval + captured + self.config.futility_margin_qs < alpha {
                    self.stats.qs_futility += 1;
                    self.board.undo_move();
                    continue;
                }
            }

            // Past the even captures only evasions and wanted checks remain
            if !in_check
                && !(gives_check && generate_checks)
                && self.iterators[ply].phase() > Phase::EqualCaptures
            {
                self.board.undo_move();
                continue;
            }

            let result = self.quiescence(qs_depth + 1, -beta, -alpha);
            self.board.undo_move();
            let score = -result?;
            if score > alpha {
                alpha = score;
                best_move = mv;
                if score >= beta {
                    break;
                }
            }
        }

        if in_check && !valid {
            return Ok(value_mated_in(ply));
        }
        self.tt.save(key, tt_depth, best_move, alpha, alpha0, beta, ply);
        Ok(alpha)
    }

    /// The side to move (the one just captured from) still has a rook or
    /// queen, or two minor pieces.
    fn defender_has_material(&self) -> bool {
        let mine = self.board.mine();
        let heavy = (self.board.piece_bb(Piece::Queen) | self.board.piece_bb(Piece::Rook)) & mine;
        let minors =
            (self.board.piece_bb(Piece::Bishop) | self.board.piece_bb(Piece::Knight)) & mine;
        heavy.is_not_empty() || minors.popcount() > 1
    }
}
