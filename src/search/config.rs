//! Search configuration: heuristic toggles, margins and extension sizes.
//!
//! Margins are in centipawns; extensions are in fractional depth units
//! (`PLY` per full ply).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub use_book: bool,
    /// Chance (percent) of consulting the book on each move
    pub book_knowledge: u32,

    pub null_move: bool,
    pub null_move_margin: i32,
    pub static_null_move: bool,
    pub iid: bool,
    pub iid_margin: i32,
    pub lmr: bool,

    pub extensions_check: i32,
    pub extensions_mate_threat: i32,
    pub extensions_pawn_push: i32,
    pub extensions_passed_pawn: i32,
    pub extensions_recapture: i32,
    pub extensions_singular: i32,
    pub singular_extension_margin: i32,

    pub aspiration_window: bool,
    /// Successive half-widths tried after each fail low or fail high
    pub aspiration_window_sizes: Vec<i32>,

    /// Transposition table size in megabytes
    pub transposition_table_size: usize,

    pub futility: bool,
    pub futility_margin: i32,
    pub aggressive_futility: bool,
    pub aggressive_futility_margin: i32,
    pub futility_margin_qs: i32,
    pub razoring: bool,
    pub razoring_margin: i32,

    /// Score of a draw for the side that can claim it, subtracted at even plies
    pub contempt_factor: i32,
    /// Percent chance of ignoring a better root move (0 = best play)
    pub rand: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            use_book: true,
            book_knowledge: 100,
            null_move: true,
            null_move_margin: 200,
            static_null_move: true,
            iid: true,
            iid_margin: 300,
            lmr: true,
            extensions_check: 2,
            extensions_mate_threat: 1,
            extensions_pawn_push: 1,
            extensions_passed_pawn: 1,
            extensions_recapture: 2,
            extensions_singular: 2,
            singular_extension_margin: 50,
            aspiration_window: true,
            aspiration_window_sizes: vec![10, 25, 150, 400, 550, 1025],
            transposition_table_size: 64,
            futility: true,
            futility_margin: 100,
            aggressive_futility: true,
            aggressive_futility_margin: 200,
            futility_margin_qs: 150,
            razoring: true,
            razoring_margin: 900,
            contempt_factor: 90,
            rand: 0,
        }
    }
}

impl SearchConfig {
    /// Every pruning heuristic and extension disabled: a plain alpha-beta
    /// with quiescence, handy as a reference in tests.
    #[must_use]
    pub fn plain() -> Self {
        SearchConfig {
            use_book: false,
            null_move: false,
            static_null_move: false,
            iid: false,
            lmr: false,
            extensions_check: 0,
            extensions_mate_threat: 0,
            extensions_pawn_push: 0,
            extensions_passed_pawn: 0,
            extensions_recapture: 0,
            extensions_singular: 0,
            aspiration_window: false,
            futility: false,
            aggressive_futility: false,
            razoring: false,
            ..SearchConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_heuristic() {
        let config = SearchConfig::default();
        assert!(config.null_move && config.lmr && config.razoring);
        assert_eq!(config.aspiration_window_sizes.first(), Some(&10));
        assert_eq!(config.contempt_factor, 90);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"null_move": false, "contempt_factor": 0}"#).unwrap();
        assert!(!config.null_move);
        assert_eq!(config.contempt_factor, 0);
        assert_eq!(config.futility_margin, SearchConfig::default().futility_margin);
    }
}
