//! Attack tables for move generation.
//!
//! Leapers (knight, king, pawn) use plain 64-entry lookups; sliders use magic
//! bitboards. The whole set is an immutable value built once and shared by
//! `Arc` between every board that needs it.

mod magic;
mod tables;

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::board::types::{Bitboard, Color, Square};
use magic::MagicTable;

static DEFAULT_TABLES: Lazy<Arc<AttackTables>> = Lazy::new(|| Arc::new(AttackTables::new()));

/// Precomputed attack sets for every piece type and square.
#[derive(Clone, Debug)]
pub struct AttackTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
    rook: MagicTable,
    bishop: MagicTable,
}

impl AttackTables {
    /// Build a fresh, unshared set of tables.
    #[must_use]
    pub fn new() -> Self {
        AttackTables {
            knight: tables::knight_table(),
            king: tables::king_table(),
            pawn: tables::pawn_table(),
            rook: MagicTable::rook(),
            bishop: MagicTable::bishop(),
        }
    }

    /// The process-wide instance, built on first use.
    #[must_use]
    pub fn shared() -> Arc<AttackTables> {
        Arc::clone(&DEFAULT_TABLES)
    }

    #[inline]
    #[must_use]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.knight[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index()]
    }

    /// Squares a pawn of `color` standing on `sq` attacks
    #[inline]
    #[must_use]
    pub fn pawn(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn[color.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn rook(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook.attacks(sq.index(), occupied)
    }

    #[inline]
    #[must_use]
    pub fn bishop(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop.attacks(sq.index(), occupied)
    }

    #[inline]
    #[must_use]
    pub fn queen(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook(sq, occupied) | self.bishop(sq, occupied)
    }

    /// Sliders among `diagonal` / `straight` that hit `sq` through `occupied`.
    ///
    /// SEE calls this after clearing a captured attacker from `occupied`, so
    /// pieces lined up behind it show up as new attackers.
    #[inline]
    #[must_use]
    pub fn xray_attacks(
        &self,
        sq: Square,
        occupied: Bitboard,
        diagonal: Bitboard,
        straight: Bitboard,
    ) -> Bitboard {
        (self.bishop(sq, occupied) & diagonal) | (self.rook(sq, occupied) & straight)
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        AttackTables::new()
    }
}
