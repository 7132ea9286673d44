//! Time controls as a front end would describe them.
//!
//! A `TimeControl` is turned into the `SearchParams` of one move; the
//! split of the clock into a per-move allotment is done by
//! `SearchParams::calculate_move_time`.

use std::time::Duration;

use crate::search::SearchParams;

/// How the next search is limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// Until stopped
    #[default]
    Infinite,
    /// Fixed number of plies
    Depth(u32),
    /// Roughly this many nodes
    Nodes(u64),
    /// Fixed time per move
    MoveTime(Duration),
    /// Game clock for both sides
    Incremental {
        white: Duration,
        black: Duration,
        white_inc: Duration,
        black_inc: Duration,
        moves_to_go: Option<u32>,
    },
}

impl TimeControl {
    /// Same clock and increment for both sides.
    #[must_use]
    pub fn incremental(time_left: Duration, inc: Duration, moves_to_go: Option<u32>) -> Self {
        TimeControl::Incremental {
            white: time_left,
            black: time_left,
            white_inc: inc,
            black_inc: inc,
            moves_to_go,
        }
    }

    #[must_use]
    pub fn move_time_ms(time_ms: u64) -> Self {
        TimeControl::MoveTime(Duration::from_millis(time_ms))
    }

    /// No clock bounds the search.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(
            self,
            TimeControl::Infinite | TimeControl::Depth(_) | TimeControl::Nodes(_)
        )
    }

    /// Parameters for one search under this control.
    #[must_use]
    pub fn to_params(self, ponder: bool) -> SearchParams {
        let mut params = SearchParams {
            ponder,
            ..SearchParams::default()
        };
        match self {
            TimeControl::Infinite => params.infinite = true,
            TimeControl::Depth(depth) => params.depth = Some(depth),
            TimeControl::Nodes(nodes) => params.nodes = Some(nodes),
            TimeControl::MoveTime(time) => params.move_time = Some(millis(time)),
            TimeControl::Incremental {
                white,
                black,
                white_inc,
                black_inc,
                moves_to_go,
            } => {
                params.wtime = millis(white);
                params.btime = millis(black);
                params.winc = millis(white_inc);
                params.binc = millis(black_inc);
                params.moves_to_go = moves_to_go;
            }
        }
        params
    }
}

impl From<TimeControl> for SearchParams {
    fn from(tc: TimeControl) -> Self {
        tc.to_params(false)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    #[test]
    fn clock_is_split_over_moves_to_go() {
        let tc = TimeControl::incremental(Duration::from_secs(60), Duration::from_secs(1), Some(20));
        let params = SearchParams::from(tc);
        assert!(params.manages_time());
        assert_eq!(
            params.calculate_move_time(Color::Black),
            Some(Duration::from_millis(4000))
        );
    }

    #[test]
    fn sides_use_their_own_clock() {
        let tc = TimeControl::Incremental {
            white: Duration::from_secs(40),
            black: Duration::from_secs(80),
            white_inc: Duration::ZERO,
            black_inc: Duration::ZERO,
            moves_to_go: None,
        };
        let params = tc.to_params(false);
        assert_eq!(
            params.calculate_move_time(Color::White),
            Some(Duration::from_secs(1))
        );
        assert_eq!(
            params.calculate_move_time(Color::Black),
            Some(Duration::from_secs(2))
        );
    }

    #[test]
    fn unlimited_controls_have_no_allotment() {
        for tc in [TimeControl::Infinite, TimeControl::Depth(6), TimeControl::Nodes(10_000)] {
            assert!(tc.is_unlimited());
            assert_eq!(tc.to_params(false).calculate_move_time(Color::White), None);
        }
        let fixed = TimeControl::move_time_ms(250);
        assert!(!fixed.is_unlimited());
        assert!(!SearchParams::from(fixed).manages_time());
    }

    #[test]
    fn ponder_flag_is_carried() {
        assert!(TimeControl::move_time_ms(100).to_params(true).ponder);
    }
}
