//! Per-search limits: clocks, fixed depth or node count, move time.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Color;

/// Moves assumed left in the game when the clock gives no `moves_to_go`
pub const DEFAULT_MOVES_TO_GO: u32 = 40;

/// Limits for one call to `SearchEngine::go`. Times are in milliseconds;
/// zero or `None` means "not given".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    pub wtime: u64,
    pub btime: u64,
    pub winc: u64,
    pub binc: u64,
    pub moves_to_go: Option<u32>,
    /// Stop after completing this many plies
    pub depth: Option<u32>,
    /// Stop after roughly this many nodes
    pub nodes: Option<u64>,
    /// Fixed thinking time
    pub move_time: Option<u64>,
    pub infinite: bool,
    /// Search on the opponent's time until `ponderhit` or `stop`
    pub ponder: bool,
}

impl SearchParams {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchParams {
            depth: Some(depth),
            ..SearchParams::default()
        }
    }

    #[must_use]
    pub fn move_time(ms: u64) -> Self {
        SearchParams {
            move_time: Some(ms),
            ..SearchParams::default()
        }
    }

    #[must_use]
    pub fn infinite() -> Self {
        SearchParams {
            infinite: true,
            ..SearchParams::default()
        }
    }

    /// Clock for `side`: remaining time and increment.
    fn clock(&self, side: Color) -> (u64, u64) {
        match side {
            Color::White => (self.wtime, self.winc),
            Color::Black => (self.btime, self.binc),
        }
    }

    /// Thinking time allotted to `side`, `None` for an unbounded search.
    ///
    /// A fixed move time wins over the clock; otherwise the remaining time is
    /// split evenly over the moves still to play and the increment is added.
    #[must_use]
    pub fn calculate_move_time(&self, side: Color) -> Option<Duration> {
        if self.infinite {
            return None;
        }
        if let Some(ms) = self.move_time {
            return Some(Duration::from_millis(ms));
        }
        let (time, inc) = self.clock(side);
        if time == 0 {
            return None;
        }
        let moves = u64::from(self.moves_to_go.filter(|&m| m > 0).unwrap_or(DEFAULT_MOVES_TO_GO));
        Some(Duration::from_millis(time / moves + inc))
    }

    /// Whether the search runs on a game clock, so it may stretch its
    /// allotment when the score collapses.
    #[must_use]
    pub fn manages_time(&self) -> bool {
        !self.infinite && self.move_time.is_none() && (self.wtime > 0 || self.btime > 0)
    }
}
