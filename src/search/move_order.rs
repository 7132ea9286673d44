//! Staged move ordering.
//!
//! Moves come out phase by phase: hash move, winning captures and queen
//! promotions, even captures, killers, quiet moves by history, and losing
//! captures last. Each phase is generated or scored only when reached, and
//! moves inside a phase are drawn best-first by selection.

use crate::board::{Board, GenType, Move, MoveList, Piece, ScoredMoveList};

use super::constants::{
    AGGRESSOR_PIECE_VALUES, SCORE_PROMOTION_QUEEN, SCORE_UNDERPROMOTION, VICTIM_PIECE_VALUES,
};
use super::sort_info::SortInfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Tt,
    GenCaptures,
    GoodCaptures,
    EqualCaptures,
    GenQuiet,
    Killer1,
    Killer2,
    Quiet,
    BadCaptures,
    End,
}

/// Per-ply move source. One iterator is kept for every ply of the search
/// and reset at each node.
#[derive(Clone, Debug)]
pub struct MoveIterator {
    ply: usize,
    phase: Phase,
    tt_move: Move,
    killers: [Move; 2],
    found_killer: [bool; 2],
    quiescence: bool,
    generate_checks: bool,
    check_evasion: bool,
    good_captures: ScoredMoveList,
    equal_captures: ScoredMoveList,
    bad_captures: ScoredMoveList,
    quiet: ScoredMoveList,
    scratch: MoveList,
}

impl MoveIterator {
    #[must_use]
    pub fn new(ply: usize) -> Self {
        MoveIterator {
            ply,
            phase: Phase::End,
            tt_move: Move::NONE,
            killers: [Move::NONE; 2],
            found_killer: [false; 2],
            quiescence: false,
            generate_checks: false,
            check_evasion: false,
            good_captures: ScoredMoveList::new(),
            equal_captures: ScoredMoveList::new(),
            bad_captures: ScoredMoveList::new(),
            quiet: ScoredMoveList::new(),
            scratch: MoveList::new(),
        }
    }

    /// Prepare for a main-search node. `tt_move` is dropped unless it is
    /// pseudo-legal here.
    pub fn reset(&mut self, board: &Board, sort_info: &SortInfo, tt_move: Move) {
        let tt_move = if board.is_pseudo_legal(tt_move) {
            tt_move
        } else {
            Move::NONE
        };
        self.start(board, sort_info, tt_move, false, true);
    }

    /// Prepare for a quiescence node: tactical moves only, plus quiet checks
    /// when `generate_checks` is set and every evasion when in check.
    pub fn reset_quiescence(&mut self, board: &Board, sort_info: &SortInfo, generate_checks: bool) {
        self.start(board, sort_info, Move::NONE, true, generate_checks);
    }

    fn start(
        &mut self,
        board: &Board,
        sort_info: &SortInfo,
        tt_move: Move,
        quiescence: bool,
        generate_checks: bool,
    ) {
        self.phase = Phase::Tt;
        self.tt_move = tt_move;
        self.killers = sort_info.killers(self.ply);
        self.found_killer = [false; 2];
        self.quiescence = quiescence;
        self.generate_checks = generate_checks;
        self.check_evasion = board.in_check();
        self.good_captures.clear();
        self.equal_captures.clear();
        self.bad_captures.clear();
        self.quiet.clear();
    }

    /// Phase of the move most recently returned.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Next pseudo-legal move, or `None` when the node is exhausted.
    pub fn next(&mut self, board: &Board, sort_info: &SortInfo) -> Option<Move> {
        loop {
            match self.phase {
                Phase::Tt => {
                    self.phase = Phase::GenCaptures;
                    if self.tt_move.is_some() {
                        return Some(self.tt_move);
                    }
                }
                Phase::GenCaptures => {
                    self.generate_captures(board);
                    self.phase = Phase::GoodCaptures;
                }
                Phase::GoodCaptures => match self.good_captures.pick_best() {
                    Some(sm) => return Some(sm.mv),
                    None => self.phase = Phase::EqualCaptures,
                },
                Phase::EqualCaptures => match self.equal_captures.pick_best() {
                    Some(sm) => return Some(sm.mv),
                    None => self.phase = Phase::GenQuiet,
                },
                Phase::GenQuiet => {
                    if self.quiescence && !self.generate_checks && !self.check_evasion {
                        self.phase = Phase::End;
                        return None;
                    }
                    self.generate_quiet(board, sort_info);
                    self.phase = Phase::Killer1;
                }
                Phase::Killer1 => {
                    self.phase = Phase::Killer2;
                    if self.found_killer[0] {
                        return Some(self.killers[0]);
                    }
                }
                Phase::Killer2 => {
                    self.phase = Phase::Quiet;
                    if self.found_killer[1] {
                        return Some(self.killers[1]);
                    }
                }
                Phase::Quiet => match self.quiet.pick_best() {
                    Some(sm) => return Some(sm.mv),
                    None => self.phase = Phase::BadCaptures,
                },
                Phase::BadCaptures => match self.bad_captures.pick_best() {
                    Some(sm) => return Some(sm.mv),
                    None => self.phase = Phase::End,
                },
                Phase::End => return None,
            }
        }
    }

    /// Split captures and queen promotions by SEE into good, equal and bad.
    fn generate_captures(&mut self, board: &Board) {
        self.scratch.clear();
        board.generate_moves(GenType::Tactical, &mut self.scratch);
        for &mv in self.scratch.iter() {
            if mv == self.tt_move {
                continue;
            }
            let see = if mv.is_capture() { board.see(mv) } else { 0 };
            if see < 0 {
                self.bad_captures.push(mv, see);
                continue;
            }
            let mut score = 0;
            if mv.is_capture() {
                let victim = if mv.is_en_passant() {
                    Some(Piece::Pawn)
                } else {
                    board.piece_at(mv.to()).map(|(_, p)| p)
                };
                let victim_idx = victim.map_or(0, |p| p.index() + 1);
                score = VICTIM_PIECE_VALUES[victim_idx]
                    - AGGRESSOR_PIECE_VALUES[mv.piece().index() + 1];
            }
            let queen_promotion = mv.promotion() == Some(Piece::Queen);
            if see > 0 || queen_promotion {
                if queen_promotion {
                    score += SCORE_PROMOTION_QUEEN;
                }
                self.good_captures.push(mv, score);
            } else {
                self.equal_captures.push(mv, score);
            }
        }
    }

    /// Quiet moves and under-promotions, scored by history. Killers found
    /// among them are held back for their own phases.
    fn generate_quiet(&mut self, board: &Board, sort_info: &SortInfo) {
        self.scratch.clear();
        board.generate_moves(GenType::Quiet, &mut self.scratch);
        for &mv in self.scratch.iter() {
            if mv == self.tt_move {
                continue;
            }
            if mv == self.killers[0] {
                self.found_killer[0] = true;
            } else if mv == self.killers[1] {
                self.found_killer[1] = true;
            } else if mv.is_promotion() {
                self.quiet.push(mv, SCORE_UNDERPROMOTION);
            } else {
                self.quiet.push(mv, sort_info.history_score(mv));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Square, TYPE_NORMAL};

    fn drain(iter: &mut MoveIterator, board: &Board, info: &SortInfo) -> Vec<(Move, Phase)> {
        let mut out = Vec::new();
        while let Some(mv) = iter.next(board, info) {
            out.push((mv, iter.phase()));
        }
        out
    }

    #[test]
    fn yields_every_pseudo_legal_move_once() {
        let board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let info = SortInfo::new();
        let mut iter = MoveIterator::new(0);
        iter.reset(&board, &info, Move::NONE);
        let mut produced: Vec<u32> = drain(&mut iter, &board, &info)
            .iter()
            .map(|(m, _)| m.raw())
            .collect();
        let mut expected: Vec<u32> = board.pseudo_legal_moves().iter().map(|m| m.raw()).collect();
        produced.sort_unstable();
        expected.sort_unstable();
        assert_eq!(produced, expected);
    }

    #[test]
    fn hash_move_first_and_not_repeated() {
        let board = Board::new();
        let info = SortInfo::new();
        let tt = Move::new(Square::new(1, 3), Square::new(3, 3), Piece::Pawn, false, TYPE_NORMAL);
        let mut iter = MoveIterator::new(0);
        iter.reset(&board, &info, tt);
        let moves = drain(&mut iter, &board, &info);
        assert_eq!(moves[0].0, tt);
        assert_eq!(moves.iter().filter(|(m, _)| *m == tt).count(), 1);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn illegal_hash_move_is_ignored() {
        let board = Board::new();
        let info = SortInfo::new();
        let bogus = Move::new(Square::new(3, 3), Square::new(4, 3), Piece::Pawn, false, TYPE_NORMAL);
        let mut iter = MoveIterator::new(0);
        iter.reset(&board, &info, bogus);
        let moves = drain(&mut iter, &board, &info);
        assert!(moves.iter().all(|(m, _)| *m != bogus));
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn captures_are_split_by_exchange_value() {
        // Knight can take a free rook, a pawn defended by a pawn, or play quietly
        let board = Board::from_fen("4k3/8/1r3p2/4p3/2N5/8/8/4K3 w - - 0 1").unwrap();
        let info = SortInfo::new();
        let mut iter = MoveIterator::new(0);
        iter.reset(&board, &info, Move::NONE);
        let moves = drain(&mut iter, &board, &info);

        let (first, phase) = moves[0];
        assert_eq!(first.to(), Square::new(5, 1));
        assert_eq!(phase, Phase::GoodCaptures);

        let (last, phase) = *moves.last().unwrap();
        assert_eq!(last.to(), Square::new(4, 4));
        assert_eq!(phase, Phase::BadCaptures);
    }

    #[test]
    fn killers_follow_captures_and_precede_quiet_moves() {
        let board = Board::new();
        let mut info = SortInfo::new();
        let killer = Move::new(Square::B1, Square::new(2, 2), Piece::Knight, false, TYPE_NORMAL);
        info.beta_cutoff(killer, 2);
        let mut iter = MoveIterator::new(2);
        iter.reset(&board, &info, Move::NONE);
        let (first, phase) = drain(&mut iter, &board, &info)[0];
        assert_eq!(first, killer);
        assert_eq!(phase, Phase::Killer2);
    }

    #[test]
    fn quiescence_stops_after_captures_unless_in_check() {
        let board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let info = SortInfo::new();
        let mut iter = MoveIterator::new(0);
        iter.reset_quiescence(&board, &info, false);
        let moves = drain(&mut iter, &board, &info);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].0.is_capture());

        let board = Board::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        iter.reset_quiescence(&board, &info, false);
        let moves = drain(&mut iter, &board, &info);
        assert!(moves.iter().any(|(m, _)| !m.is_capture()));
    }

    #[test]
    fn under_promotions_come_after_quiet_moves() {
        let board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        let info = SortInfo::new();
        let mut iter = MoveIterator::new(0);
        iter.reset(&board, &info, Move::NONE);
        let moves = drain(&mut iter, &board, &info);
        assert_eq!(moves[0].0.promotion(), Some(Piece::Queen));
        let first_under = moves
            .iter()
            .position(|(m, _)| m.is_promotion() && m.promotion() != Some(Piece::Queen))
            .unwrap();
        assert!(moves[first_under..].iter().all(|(m, _)| m.is_promotion()));
    }
}
