//! Transposition table for caching search results.
//!
//! A flat array of slots addressed by the high bits of the position's index
//! key. Lookups and stores scan up to `MAX_PROBES` consecutive slots; each
//! slot carries a verifier derived from both Zobrist words, so a false hit
//! needs a collision in both.
//!
//! Entries are aged by a generation counter bumped once per root search.
//! When the probe window is full the table overwrites an entry from an older
//! search first, then any entry that is not an exact score, and otherwise
//! drops the new entry.

use std::mem;

use crate::board::Move;
use crate::search::constants::VALUE_IS_MATE;

/// Consecutive slots examined per lookup or store
pub const MAX_PROBES: usize = 4;

/// Index and verifier for one position, see `Board::tt_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtKey {
    pub index: u64,
    pub verifier: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    /// Score is the exact value
    Exact,
    /// Search failed low: the score is an upper bound
    FailLow,
    /// Search failed high: the score is a lower bound
    FailHigh,
    /// Only the static evaluation is known
    Eval,
}

impl BoundType {
    fn to_bits(self) -> u64 {
        match self {
            BoundType::Exact => 1,
            BoundType::FailLow => 2,
            BoundType::FailHigh => 3,
            BoundType::Eval => 4,
        }
    }

    fn from_bits(v: u64) -> Self {
        match v & 0xf {
            1 => BoundType::Exact,
            2 => BoundType::FailLow,
            3 => BoundType::FailHigh,
            _ => BoundType::Eval,
        }
    }
}

/// Unpacked TT entry for reading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub best_move: Move,
    pub bound: BoundType,
    pub generation: u8,
    pub depth: u8,
    /// Search score, mate scores already relative to the probing ply
    pub score: i32,
    /// Static evaluation from white's point of view, if one was stored
    pub eval: Option<i32>,
}

/// Packed info word:
/// - bits 0-20:  best move (0 = none)
/// - bits 21-24: bound type
/// - bits 32-39: generation
/// - bits 40-47: depth analysed
/// - bits 48-63: score (i16)
fn pack_info(best_move: Move, bound: BoundType, generation: u8, depth: u8, score: i16) -> u64 {
    (u64::from(best_move.raw()) & 0x1f_ffff)
        | (bound.to_bits() << 21)
        | (u64::from(generation) << 32)
        | (u64::from(depth) << 40)
        | (u64::from(score as u16) << 48)
}

fn info_generation(info: u64) -> u8 {
    ((info >> 32) & 0xff) as u8
}

fn info_bound(info: u64) -> BoundType {
    BoundType::from_bits(info >> 21)
}

const NO_EVAL: i16 = i16::MIN;

#[derive(Clone, Copy, Debug, Default)]
struct TtSlot {
    verifier: u64,
    /// Zero marks an empty slot
    info: u64,
    eval: i16,
}

impl TtSlot {
    fn is_empty(&self) -> bool {
        self.info == 0
    }
}

/// Single-owner transposition table.
pub struct TranspositionTable {
    slots: Vec<TtSlot>,
    size_bits: u32,
    generation: u8,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes, rounded down to a power
    /// of two number of slots.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let wanted = (bytes / mem::size_of::<TtSlot>()).max(MAX_PROBES);
        let size_bits = usize::BITS - 1 - wanted.leading_zeros();
        let size = 1usize << size_bits;
        log::debug!(
            "transposition table: {} slots, {:.1} MB",
            size,
            (size * mem::size_of::<TtSlot>()) as f64 / (1024.0 * 1024.0)
        );
        TranspositionTable {
            slots: vec![TtSlot::default(); size],
            size_bits,
            generation: 0,
        }
    }

    /// Number of slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(TtSlot::is_empty)
    }

    #[inline]
    fn start_index(&self, key: TtKey) -> usize {
        (key.index >> (64 - self.size_bits)) as usize
    }

    #[inline]
    fn window(&self, key: TtKey) -> std::ops::Range<usize> {
        let start = self.start_index(key);
        start..(start + MAX_PROBES).min(self.slots.len())
    }

    fn find(&self, key: TtKey) -> Option<usize> {
        self.window(key)
            .find(|&i| !self.slots[i].is_empty() && self.slots[i].verifier == key.verifier)
    }

    /// Look up `key`. Mate scores are converted back to distance from
    /// the node `ply` plies below the search root.
    #[must_use]
    pub fn probe(&self, key: TtKey, ply: usize) -> Option<TtEntry> {
        let slot = &self.slots[self.find(key)?];
        let info = slot.info;
        let mut score = i32::from((info >> 48) as u16 as i16);
        if score >= VALUE_IS_MATE {
            score -= ply as i32;
        } else if score <= -VALUE_IS_MATE {
            score += ply as i32;
        }
        Some(TtEntry {
            best_move: Move::from_raw((info & 0x1f_ffff) as u32),
            bound: info_bound(info),
            generation: info_generation(info),
            depth: ((info >> 40) & 0xff) as u8,
            score,
            eval: (slot.eval != NO_EVAL).then_some(i32::from(slot.eval)),
        })
    }

    /// Best move stored for `key`, if any.
    #[must_use]
    pub fn best_move(&self, key: TtKey) -> Option<Move> {
        self.probe(key, 0)
            .map(|e| e.best_move)
            .filter(|m| m.is_some())
    }

    /// Whether `entry` was written during the current root search.
    #[inline]
    #[must_use]
    pub fn is_current(&self, entry: &TtEntry) -> bool {
        entry.generation == self.generation
    }

    /// Slot to write `key` into, or `None` to drop the entry.
    fn replacement_slot(&self, key: TtKey) -> Option<usize> {
        let mut old_generation = None;
        let mut not_exact = None;
        for i in self.window(key) {
            let slot = &self.slots[i];
            if slot.is_empty() || slot.verifier == key.verifier {
                return Some(i);
            }
            if old_generation.is_none() && info_generation(slot.info) != self.generation {
                old_generation = Some(i);
            }
            if not_exact.is_none() && info_bound(slot.info) != BoundType::Exact {
                not_exact = Some(i);
            }
        }
        old_generation.or(not_exact)
    }

    /// Store a search result, picking the bound from the `alpha`/`beta`
    /// window the node was searched with.
    #[allow(clippy::too_many_arguments)]
    pub fn save(
        &mut self,
        key: TtKey,
        depth: i32,
        best_move: Move,
        score: i32,
        alpha: i32,
        beta: i32,
        ply: usize,
    ) {
        let bound = if score <= alpha {
            BoundType::FailLow
        } else if score >= beta {
            BoundType::FailHigh
        } else {
            BoundType::Exact
        };
        self.store(key, bound, depth, best_move, score, ply);
    }

    /// Store an entry with an explicit bound.
    ///
    /// A static eval already held for the same position is kept.
    pub fn store(
        &mut self,
        key: TtKey,
        bound: BoundType,
        depth: i32,
        best_move: Move,
        score: i32,
        ply: usize,
    ) {
        let Some(i) = self.replacement_slot(key) else {
            return;
        };
        // Mate scores are stored relative to this node, not the root
        let score = if score >= VALUE_IS_MATE {
            score + ply as i32
        } else if score <= -VALUE_IS_MATE {
            score - ply as i32
        } else {
            score
        };
        let score = score.clamp(i32::from(i16::MIN + 1), i32::from(i16::MAX)) as i16;
        let depth = depth.clamp(0, 255) as u8;

        let slot = &mut self.slots[i];
        let eval = if !slot.is_empty() && slot.verifier == key.verifier {
            slot.eval
        } else {
            NO_EVAL
        };
        *slot = TtSlot {
            verifier: key.verifier,
            info: pack_info(best_move, bound, self.generation, depth, score),
            eval,
        };
    }

    /// Cache the static evaluation (white's point of view) of `key`.
    ///
    /// Attached to an existing entry for the same position; otherwise an
    /// eval-only entry is created.
    pub fn set_eval(&mut self, key: TtKey, eval: i32) {
        let eval = eval.clamp(i32::from(i16::MIN + 1), i32::from(i16::MAX)) as i16;
        if let Some(i) = self.find(key) {
            self.slots[i].eval = eval;
            return;
        }
        let Some(i) = self.replacement_slot(key) else {
            return;
        };
        self.slots[i] = TtSlot {
            verifier: key.verifier,
            info: pack_info(Move::NONE, BoundType::Eval, self.generation, 0, 0),
            eval,
        };
    }

    /// Start a new root search.
    pub fn new_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn generation(&self) -> u8 {
        self.generation
    }

    /// Per mille of sampled slots holding an entry of the current generation.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample]
            .iter()
            .filter(|s| !s.is_empty() && info_generation(s.info) == self.generation)
            .count();
        (used * 1000 / sample) as u32
    }

    /// Wipe every entry.
    pub fn clear(&mut self) {
        self.slots.fill(TtSlot::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, Square, TYPE_NORMAL};

    fn key(index: u64, verifier: u64) -> TtKey {
        TtKey { index, verifier }
    }

    fn some_move() -> Move {
        Move::new(Square::G1, Square::new(2, 5), Piece::Knight, false, TYPE_NORMAL)
    }

    #[test]
    fn store_and_probe_round_trip() {
        let mut tt = TranspositionTable::new(1);
        let k = key(0x1234_5678_9ABC_DEF0, 42);
        tt.save(k, 10, some_move(), 35, -100, 100, 0);

        let entry = tt.probe(k, 0).expect("entry");
        assert_eq!(entry.best_move, some_move());
        assert_eq!(entry.score, 35);
        assert_eq!(entry.bound, BoundType::Exact);
        assert_eq!(entry.depth, 10);
        assert!(tt.is_current(&entry));
        assert_eq!(entry.eval, None);
    }

    #[test]
    fn bound_follows_window() {
        let mut tt = TranspositionTable::new(1);
        let low = key(1 << 40, 1);
        let high = key(2 << 40, 2);
        tt.save(low, 4, Move::NONE, -100, -100, 100, 0);
        tt.save(high, 4, some_move(), 250, -100, 100, 0);
        assert_eq!(tt.probe(low, 0).unwrap().bound, BoundType::FailLow);
        assert_eq!(tt.probe(high, 0).unwrap().bound, BoundType::FailHigh);
    }

    #[test]
    fn wrong_verifier_misses() {
        let mut tt = TranspositionTable::new(1);
        tt.save(key(7 << 50, 1), 3, some_move(), 0, -1, 1, 0);
        assert!(tt.probe(key(7 << 50, 2), 0).is_none());
    }

    #[test]
    fn mate_scores_are_stored_relative_to_the_node() {
        let mut tt = TranspositionTable::new(1);
        let k = key(99 << 48, 5);
        // Mate found 3 plies below the root, stored from a node at ply 3
        let mate = crate::search::constants::MATE - 7;
        tt.save(k, 6, some_move(), mate, -1, 1, 3);
        assert_eq!(tt.probe(k, 3).unwrap().score, mate);
        // Reached again at ply 5, the mate is two plies further from the root
        assert_eq!(tt.probe(k, 5).unwrap().score, mate - 2);
    }

    #[test]
    fn full_window_drops_new_exact_entries_but_replaces_old_generation() {
        let mut tt = TranspositionTable::new(1);
        let base = 0u64;
        for v in 1..=MAX_PROBES as u64 {
            tt.save(key(base, v), 5, some_move(), 0, -1, 1, 0);
        }
        let newcomer = key(base, 100);
        tt.save(newcomer, 5, some_move(), 0, -1, 1, 0);
        assert!(tt.probe(newcomer, 0).is_none());

        tt.new_generation();
        tt.save(newcomer, 5, some_move(), 0, -1, 1, 0);
        assert!(tt.probe(newcomer, 0).is_some());
        // The first slot of the old generation was the one replaced
        assert!(tt.probe(key(base, 1), 0).is_none());
        assert!(tt.probe(key(base, 2), 0).is_some());
    }

    #[test]
    fn non_exact_entries_give_way() {
        let mut tt = TranspositionTable::new(1);
        tt.save(key(0, 1), 5, some_move(), 0, -1, 1, 0);
        tt.save(key(0, 2), 5, some_move(), 10, -1, 1, 0);
        tt.save(key(0, 3), 5, some_move(), 0, -1, 1, 0);
        tt.save(key(0, 4), 5, some_move(), 0, -1, 1, 0);
        tt.save(key(0, 5), 5, some_move(), 0, -1, 1, 0);
        assert!(tt.probe(key(0, 5), 0).is_some());
        assert!(tt.probe(key(0, 2), 0).is_none());
    }

    #[test]
    fn eval_is_kept_alongside_search_results() {
        let mut tt = TranspositionTable::new(1);
        let k = key(3 << 60, 9);
        tt.set_eval(k, -45);
        let e = tt.probe(k, 0).unwrap();
        assert_eq!(e.bound, BoundType::Eval);
        assert_eq!(e.eval, Some(-45));

        tt.save(k, 4, some_move(), 60, -100, 100, 0);
        let e = tt.probe(k, 0).unwrap();
        assert_eq!(e.bound, BoundType::Exact);
        assert_eq!(e.eval, Some(-45));
    }

    #[test]
    fn clear_and_hashfull() {
        let mut tt = TranspositionTable::new(1);
        assert_eq!(tt.hashfull(), 0);
        for i in 0..64u64 {
            tt.save(key(i << (64 - 10), i + 1), 1, Move::NONE, 0, -1, 1, 0);
        }
        assert!(tt.hashfull() > 0);
        tt.clear();
        assert_eq!(tt.hashfull(), 0);
        assert!(tt.is_empty());
    }
}
