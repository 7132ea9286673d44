//! Killer moves and the history heuristic.

use crate::board::Move;

use super::constants::{HISTORY_MAX, MAX_DEPTH};

/// Move ordering knowledge gathered from beta cutoffs, shared by every ply
/// of one search.
#[derive(Clone, Debug)]
pub struct SortInfo {
    killers: [[Move; 2]; MAX_DEPTH],
    /// history[piece][to]
    history: [[i32; 64]; 6],
}

impl Default for SortInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl SortInfo {
    #[must_use]
    pub fn new() -> Self {
        SortInfo {
            killers: [[Move::NONE; 2]; MAX_DEPTH],
            history: [[0; 64]; 6],
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Record that `mv` caused a beta cutoff `ply` plies below the root.
    ///
    /// Captures and promotions are ordered by SEE and never become killers or
    /// gain history.
    pub fn beta_cutoff(&mut self, mv: Move, ply: usize) {
        if mv.is_none() || mv.is_tactical() {
            return;
        }
        if let Some(slots) = self.killers.get_mut(ply) {
            if slots[0] != mv {
                slots[1] = slots[0];
                slots[0] = mv;
            }
        }
        let entry = &mut self.history[mv.piece().index()][mv.to().index()];
        *entry += 1;
        if *entry >= HISTORY_MAX {
            for row in &mut self.history {
                for value in row.iter_mut() {
                    *value >>= 1;
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn history_score(&self, mv: Move) -> i32 {
        self.history[mv.piece().index()][mv.to().index()]
    }

    /// The two killer slots at `ply`, most recent first.
    #[must_use]
    pub fn killers(&self, ply: usize) -> [Move; 2] {
        self.killers.get(ply).copied().unwrap_or([Move::NONE; 2])
    }

    #[must_use]
    pub fn is_killer(&self, mv: Move, ply: usize) -> bool {
        mv.is_some() && self.killers(ply).contains(&mv)
    }
}
