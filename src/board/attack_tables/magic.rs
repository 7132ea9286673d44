//! Magic bitboard tables for sliding pieces.
//!
//! Each square has a relevant-blocker mask (rays minus board edges), a magic
//! multiplier and a shift. `((occ & mask) * magic) >> shift` is a dense index
//! into that square's slice of one shared attack vector. The constants are a
//! fixed, pre-validated set: several squares use fewer index bits than their
//! mask has, which only works because every colliding occupancy maps to the
//! same attack set.

use crate::board::types::Bitboard;

#[rustfmt::skip]
const ROOK_SHIFTS: [u8; 64] = [
    52, 53, 53, 53, 53, 53, 53, 52,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 54, 54, 54, 54, 53,
    53, 54, 54, 53, 53, 53, 53, 53,
];

#[rustfmt::skip]
const ROOK_MAGICS: [u64; 64] = [
    0x0080001020400080, 0x0040001000200040, 0x0080081000200080, 0x0080040800100080,
    0x0080020400080080, 0x0080010200040080, 0x0080008001000200, 0x0080002040800100,
    0x0000800020400080, 0x0000400020005000, 0x0000801000200080, 0x0000800800100080,
    0x0000800400080080, 0x0000800200040080, 0x0000800100020080, 0x0000800040800100,
    0x0000208000400080, 0x0000404000201000, 0x0000808010002000, 0x0000808008001000,
    0x0000808004000800, 0x0000808002000400, 0x0000010100020004, 0x0000020000408104,
    0x0000208080004000, 0x0000200040005000, 0x0000100080200080, 0x0000080080100080,
    0x0000040080080080, 0x0000020080040080, 0x0000010080800200, 0x0000800080004100,
    0x0000204000800080, 0x0000200040401000, 0x0000100080802000, 0x0000080080801000,
    0x0000040080800800, 0x0000020080800400, 0x0000020001010004, 0x0000800040800100,
    0x0000204000808000, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000010002008080, 0x0000004081020004,
    0x0000204000800080, 0x0000200040008080, 0x0000100020008080, 0x0000080010008080,
    0x0000040008008080, 0x0000020004008080, 0x0000800100020080, 0x0000800041000080,
    0x00FFFCDDFCED714A, 0x007FFCDDFCED714A, 0x003FFFCDFFD88096, 0x0000040810002101,
    0x0001000204080011, 0x0001000204000801, 0x0001000082000401, 0x0001FFFAABFAD1A2
];

#[rustfmt::skip]
const BISHOP_SHIFTS: [u8; 64] = [
    58, 59, 59, 59, 59, 59, 59, 58,
    59, 59, 59, 59, 59, 59, 59, 59,
    59, 59, 57, 57, 57, 57, 59, 59,
    59, 59, 57, 55, 55, 57, 59, 59,
    59, 59, 57, 55, 55, 57, 59, 59,
    59, 59, 57, 57, 57, 57, 59, 59,
    59, 59, 59, 59, 59, 59, 59, 59,
    58, 59, 59, 59, 59, 59, 59, 58,
];

#[rustfmt::skip]
const BISHOP_MAGICS: [u64; 64] = [
    0x0002020202020200, 0x0002020202020000, 0x0004010202000000, 0x0004040080000000,
    0x0001104000000000, 0x0000821040000000, 0x0000410410400000, 0x0000104104104000,
    0x0000040404040400, 0x0000020202020200, 0x0000040102020000, 0x0000040400800000,
    0x0000011040000000, 0x0000008210400000, 0x0000004104104000, 0x0000002082082000,
    0x0004000808080800, 0x0002000404040400, 0x0001000202020200, 0x0000800802004000,
    0x0000800400A00000, 0x0000200100884000, 0x0000400082082000, 0x0000200041041000,
    0x0002080010101000, 0x0001040008080800, 0x0000208004010400, 0x0000404004010200,
    0x0000840000802000, 0x0000404002011000, 0x0000808001041000, 0x0000404000820800,
    0x0001041000202000, 0x0000820800101000, 0x0000104400080800, 0x0000020080080080,
    0x0000404040040100, 0x0000808100020100, 0x0001010100020800, 0x0000808080010400,
    0x0000820820004000, 0x0000410410002000, 0x0000082088001000, 0x0000002011000800,
    0x0000080100400400, 0x0001010101000200, 0x0002020202000400, 0x0001010101000200,
    0x0000410410400000, 0x0000208208200000, 0x0000002084100000, 0x0000000020880000,
    0x0000001002020000, 0x0000040408020000, 0x0004040404040000, 0x0002020202020000,
    0x0000104104104000, 0x0000002082082000, 0x0000000020841000, 0x0000000000208800,
    0x0000000010020200, 0x0000000404080200, 0x0000040404040400, 0x0002020202020200
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Clone, Copy, Debug)]
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u8,
    offset: usize,
}

/// Per-square magic parameters plus the flat attack vector they index.
#[derive(Clone, Debug)]
pub(super) struct MagicTable {
    entries: [MagicEntry; 64],
    attacks: Vec<Bitboard>,
}

impl MagicTable {
    pub(super) fn rook() -> Self {
        Self::build(&ROOK_DIRECTIONS, &ROOK_MAGICS, &ROOK_SHIFTS)
    }

    pub(super) fn bishop() -> Self {
        Self::build(&BISHOP_DIRECTIONS, &BISHOP_MAGICS, &BISHOP_SHIFTS)
    }

    fn build(directions: &[(i8, i8); 4], magics: &[u64; 64], shifts: &[u8; 64]) -> Self {
        let mut entries = [MagicEntry {
            mask: 0,
            magic: 0,
            shift: 64,
            offset: 0,
        }; 64];
        let total: usize = shifts.iter().map(|&s| 1usize << (64 - s)).sum();
        let mut attacks = vec![Bitboard::EMPTY; total];

        let mut offset = 0;
        for sq in 0..64 {
            let mask = relevant_mask(sq, directions);
            let entry = MagicEntry {
                mask,
                magic: magics[sq],
                shift: shifts[sq],
                offset,
            };

            // Carry-rippler walk over every subset of the mask, empty set included
            let mut subset = 0u64;
            loop {
                let idx = entry.offset + entry.index(subset);
                let ray = ray_attacks(sq, subset, directions);
                debug_assert!(
                    attacks[idx].is_empty() || attacks[idx] == ray,
                    "destructive magic collision on square {sq}"
                );
                attacks[idx] = ray;
                subset = subset.wrapping_sub(mask) & mask;
                if subset == 0 {
                    break;
                }
            }

            entries[sq] = entry;
            offset += 1usize << (64 - shifts[sq]);
        }

        MagicTable { entries, attacks }
    }

    #[inline]
    pub(super) fn attacks(&self, sq: usize, occupied: Bitboard) -> Bitboard {
        let entry = &self.entries[sq];
        self.attacks[entry.offset + entry.index(occupied.0 & entry.mask)]
    }

    #[cfg(test)]
    pub(super) fn mask(&self, sq: usize) -> Bitboard {
        Bitboard(self.entries[sq].mask)
    }
}

impl MagicEntry {
    #[inline]
    fn index(&self, masked: u64) -> usize {
        (masked.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Blocker squares that can change the attack set: every ray square except the last one before the edge.
fn relevant_mask(sq: usize, directions: &[(i8, i8); 4]) -> u64 {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut mask = 0u64;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r as usize * 8 + f as usize);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Slow ray-cast reference: walk each direction until a blocker (inclusive) or the edge.
pub(super) fn ray_attacks(sq: usize, occupied: u64, directions: &[(i8, i8); 4]) -> Bitboard {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut attacks = 0u64;
    for &(dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r as usize * 8 + f as usize);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    Bitboard(attacks)
}

#[cfg(test)]
pub(super) fn rook_rays(sq: usize, occupied: u64) -> Bitboard {
    ray_attacks(sq, occupied, &ROOK_DIRECTIONS)
}

#[cfg(test)]
pub(super) fn bishop_rays(sq: usize, occupied: u64) -> Bitboard {
    ray_attacks(sq, occupied, &BISHOP_DIRECTIONS)
}
