//! Progress reporting and search statistics.

use std::fmt;

use crate::board::Move;

use super::constants::{value_is_mate, MATE};

/// One completed iteration of the root search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u32,
    /// Score from the side to move's point of view
    pub score: i32,
    pub nodes: u64,
    pub time_ms: u64,
    pub nps: u64,
    /// Per mille of the transposition table holding current entries
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

impl SearchInfo {
    /// Moves to mate, negative when the side to move is mated, `None` for
    /// a normal score.
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        if !value_is_mate(self.score) {
            return None;
        }
        let plies = MATE - self.score.abs();
        let moves = (plies + 1) / 2;
        Some(if self.score > 0 { moves } else { -moves })
    }
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth {}", self.depth)?;
        match self.mate_in() {
            Some(n) => write!(f, " score mate {n}")?,
            None => write!(f, " score cp {}", self.score)?,
        }
        write!(
            f,
            " nodes {} nps {} hashfull {} time {}",
            self.nodes, self.nps, self.hashfull, self.time_ms
        )?;
        if !self.pv.is_empty() {
            f.write_str(" pv")?;
            for mv in &self.pv {
                write!(f, " {mv}")?;
            }
        }
        Ok(())
    }
}

/// Receives progress from a running search. Called on the searching
/// thread, so implementations should return quickly.
pub trait SearchObserver: Send {
    fn info(&mut self, info: &SearchInfo);

    /// Final answer: the move to play and the reply the engine expects.
    fn best_move(&mut self, best: Move, ponder: Option<Move>);
}

/// Default observer: sends everything to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn info(&mut self, info: &SearchInfo) {
        log::info!("{info}");
    }

    fn best_move(&mut self, best: Move, ponder: Option<Move>) {
        match ponder {
            Some(p) => log::info!("bestmove {best} ponder {p}"),
            None => log::info!("bestmove {best}"),
        }
    }
}

/// Counters gathered over one `go`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qs_nodes: u64,
    pub tt_probes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub razoring: u64,
    pub static_null: u64,
    pub null_move: u64,
    pub null_move_verified: u64,
    pub iid: u64,
    pub singular: u64,
    pub futility: u64,
    pub qs_futility: u64,
    pub lmr: u64,
    pub lmr_researched: u64,
    pub pv_researched: u64,
    pub beta_cutoffs: u64,
}

impl SearchStats {
    pub fn reset(&mut self) {
        *self = SearchStats::default();
    }

    /// Write every counter at debug level.
    pub fn log(&self) {
        log::debug!(
            "nodes {} (quiescence {}) tt probes {} hits {} cutoffs {}",
            self.nodes,
            self.qs_nodes,
            self.tt_probes,
            self.tt_hits,
            self.tt_cutoffs
        );
        log::debug!(
            "razoring {} static null {} null move {} (verified {}) iid {} singular {}",
            self.razoring,
            self.static_null,
            self.null_move,
            self.null_move_verified,
            self.iid,
            self.singular
        );
        log::debug!(
            "futility {} qs futility {} lmr {} (re-searched {}) pv re-searches {} beta cutoffs {}",
            self.futility,
            self.qs_futility,
            self.lmr,
            self.lmr_researched,
            self.pv_researched,
            self.beta_cutoffs
        );
    }
}
