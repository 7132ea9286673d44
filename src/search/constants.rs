//! Search constants.
//!
//! Depths inside the search are counted in fractional plies: `PLY` units make
//! one full move of one side, so extensions can add half a ply.

// ============================================================================
// DEPTH
// ============================================================================

/// Depth units per ply
pub const PLY: i32 = 2;

/// Maximum iterative deepening depth, also the per-ply table size
pub const MAX_DEPTH: usize = 64;

/// Moves at depths below this are never reduced by LMR
pub const LMR_DEPTHS_NOT_REDUCED: i32 = 3 * PLY;

/// Razoring and static null move only apply below this depth
pub const RAZOR_DEPTH: i32 = 4 * PLY;

/// Minimum depth for a singular extension probe, by node type (root, PV, null window)
pub const SINGULAR_MOVE_DEPTH: [i32; 3] = [6 * PLY, 6 * PLY, 8 * PLY];

/// Minimum depth for internal iterative deepening, by node type
pub const IID_DEPTH: [i32; 3] = [5 * PLY, 5 * PLY, 8 * PLY];

// ============================================================================
// SCORES
// ============================================================================

/// Score of delivering mate at the root
pub const MATE: i32 = 30000;

/// Scores at or beyond this (in absolute value) are mate scores
pub const VALUE_IS_MATE: i32 = MATE - MAX_DEPTH as i32;

/// Pawn value used by the null move reduction and piece value lookups
pub const PAWN_VALUE: i32 = 100;

/// Centipawn values by piece index, king excluded
pub const PIECE_VALUES: [i32; 6] = [100, 325, 330, 500, 975, 0];

/// Iterative deepening stops once a mate this close to `MATE` is found
pub const MATE_FOUND_MARGIN: i32 = 1000;

/// The best score of an iteration falling this far below the previous one
/// buys extra thinking time
pub const PANIC_DROP: i32 = 100;

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Victim values for MVV/LVA, by piece index + 1 (0 = nothing captured)
pub const VICTIM_PIECE_VALUES: [i32; 7] = [0, 100, 325, 330, 500, 975, 10000];

/// Aggressor values for MVV/LVA, by piece index + 1
pub const AGGRESSOR_PIECE_VALUES: [i32; 7] = [0, 10, 32, 33, 50, 97, 99];

/// Ordering bonus for a queen promotion
pub const SCORE_PROMOTION_QUEEN: i32 = 975;

/// Ordering score of under-promotions, after every quiet move
pub const SCORE_UNDERPROMOTION: i32 = i32::MIN + 1;

/// History counters are halved when one reaches this
pub const HISTORY_MAX: i32 = i32::MAX - 1;

#[inline]
#[must_use]
pub const fn value_mated_in(ply: usize) -> i32 {
    -MATE + ply as i32
}

#[inline]
#[must_use]
pub const fn value_mate_in(ply: usize) -> i32 {
    MATE - ply as i32
}

#[inline]
#[must_use]
pub const fn value_is_mate(value: i32) -> bool {
    value <= -VALUE_IS_MATE || value >= VALUE_IS_MATE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SEE_PIECE_VALUES;

    #[test]
    fn exchange_values_match_search_values() {
        assert_eq!(SEE_PIECE_VALUES[..5], PIECE_VALUES[..5]);
        assert_eq!(PIECE_VALUES[0], PAWN_VALUE);
        assert_eq!(VICTIM_PIECE_VALUES[1..6], PIECE_VALUES[..5]);
    }
}
