//! Opening book lookup.

use std::collections::HashMap;

use rand::Rng;

use crate::board::{Board, Move};

/// Source of prepared moves consulted before searching.
pub trait Book {
    /// A move for the current position, or `None` when out of book.
    ///
    /// `rng` picks between several book moves for variety.
    fn get_move(&self, board: &Board, rng: &mut dyn rand::RngCore) -> Option<Move>;
}

/// Always out of book.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBook;

impl Book for NoBook {
    fn get_move(&self, _board: &Board, _rng: &mut dyn rand::RngCore) -> Option<Move> {
        None
    }
}

/// In-memory book keyed by the position's two-word Zobrist key.
///
/// Entries carry a weight; a lookup draws among the legal candidates with
/// probability proportional to it.
#[derive(Clone, Debug, Default)]
pub struct FixedBook {
    entries: HashMap<[u64; 2], Vec<(Move, u32)>>,
}

impl FixedBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `mv` with `weight` for the position `board` is in.
    pub fn insert(&mut self, board: &Board, mv: Move, weight: u32) {
        let moves = self.entries.entry(board.key()).or_default();
        match moves.iter_mut().find(|(m, _)| *m == mv) {
            Some(entry) => entry.1 = entry.1.saturating_add(weight),
            None => moves.push((mv, weight)),
        }
    }

    /// Record every position of a line given in UCI notation, each move
    /// with weight one. Stops at the first move that does not parse.
    pub fn add_line(&mut self, start: &Board, line: &[&str]) -> usize {
        let mut board = start.clone();
        let mut added = 0;
        for uci in line {
            let Ok(mv) = board.parse_uci(uci) else {
                break;
            };
            self.insert(&board, mv, 1);
            board.do_move(mv);
            added += 1;
        }
        added
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Book for FixedBook {
    fn get_move(&self, board: &Board, rng: &mut dyn rand::RngCore) -> Option<Move> {
        let moves = self.entries.get(&board.key())?;
        let mut probe = board.clone();
        let legal: Vec<(Move, u32)> = moves
            .iter()
            .copied()
            .filter(|&(mv, w)| {
                w > 0 && probe.is_pseudo_legal(mv) && {
                    let ok = probe.do_move(mv);
                    if ok {
                        probe.undo_move();
                    }
                    ok
                }
            })
            .collect();
        let total: u32 = legal.iter().map(|&(_, w)| w).sum();
        if total == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..total);
        for &(mv, w) in &legal {
            if pick < w {
                return Some(mv);
            }
            pick -= w;
        }
        None
    }
}
