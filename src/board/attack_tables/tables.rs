//! Leaper attack tables (knights, kings, pawns).

use crate::board::types::Bitboard;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Squares reached from `sq` by each (rank, file) delta, dropping off-board targets.
fn leaper_mask(sq: usize, deltas: &[(i8, i8)]) -> Bitboard {
    let r = (sq / 8) as i8;
    let f = (sq % 8) as i8;
    let mut mask = 0u64;
    for &(dr, df) in deltas {
        let nr = r + dr;
        let nf = f + df;
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            mask |= 1u64 << (nr as usize * 8 + nf as usize);
        }
    }
    Bitboard(mask)
}

pub(super) fn knight_table() -> [Bitboard; 64] {
    std::array::from_fn(|sq| leaper_mask(sq, &KNIGHT_DELTAS))
}

pub(super) fn king_table() -> [Bitboard; 64] {
    std::array::from_fn(|sq| leaper_mask(sq, &KING_DELTAS))
}

/// `[color][square]`: squares a pawn of that color on `square` attacks.
pub(super) fn pawn_table() -> [[Bitboard; 64]; 2] {
    [
        std::array::from_fn(|sq| leaper_mask(sq, &[(1, -1), (1, 1)])),
        std::array::from_fn(|sq| leaper_mask(sq, &[(-1, -1), (-1, 1)])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_counts_at_corner_and_center() {
        let knights = knight_table();
        assert_eq!(knights[0].popcount(), 2);
        assert_eq!(knights[28].popcount(), 8);
    }

    #[test]
    fn king_counts_at_corner_and_edge() {
        let kings = king_table();
        assert_eq!(kings[0].popcount(), 3);
        assert_eq!(kings[4].popcount(), 5);
        assert_eq!(kings[27].popcount(), 8);
    }

    #[test]
    fn pawn_attacks_do_not_wrap() {
        let pawns = pawn_table();
        // white pawn on a2 only attacks b3
        assert_eq!(pawns[0][8], Bitboard(1 << 17));
        // black pawn on h7 only attacks g6
        assert_eq!(pawns[1][55], Bitboard(1 << 46));
        // pawns on the last rank attack nothing forward
        assert!(pawns[0][60].is_empty());
    }
}
