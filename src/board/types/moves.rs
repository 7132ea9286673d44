//! Move types and move list.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

/// Move type field values (3 bits)
pub const TYPE_NORMAL: u32 = 0;
pub const TYPE_KINGSIDE_CASTLING: u32 = 1;
pub const TYPE_QUEENSIDE_CASTLING: u32 = 2;
pub const TYPE_PASSANT: u32 = 3;
/// Every type at or above this value is a promotion
pub const TYPE_PROMOTION_QUEEN: u32 = 4;
pub const TYPE_PROMOTION_KNIGHT: u32 = 5;
pub const TYPE_PROMOTION_BISHOP: u32 = 6;
pub const TYPE_PROMOTION_ROOK: u32 = 7;

const TO_SHIFT: u32 = 0;
const FROM_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const CAPTURE_SHIFT: u32 = 15;
const TYPE_SHIFT: u32 = 16;

/// Mask covering every meaningful bit of a packed move (used by the TT)
pub const MOVE_MASK: u32 = 0x7_FFFF;

/// Integer-packed move.
///
/// Encoding:
/// - bits 0-5:   destination square (0-63)
/// - bits 6-11:  origin square (0-63)
/// - bits 12-14: moved piece, 1 = pawn ... 6 = king
/// - bit 15:     capture flag (set for en passant too)
/// - bits 16-18: move type (normal, castling, en passant, promotion to Q/N/B/R)
///
/// The all-zero value is `Move::NONE`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u32);

impl Move {
    pub const NONE: Move = Move(0);

    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square, piece: Piece, capture: bool, move_type: u32) -> Self {
        Move(
            ((to.0 as u32) << TO_SHIFT)
                | ((from.0 as u32) << FROM_SHIFT)
                | (((piece as u32) + 1) << PIECE_SHIFT)
                | ((capture as u32) << CAPTURE_SHIFT)
                | (move_type << TYPE_SHIFT),
        )
    }

    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Move(raw & MOVE_MASK)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn is_some(self) -> bool {
        self.0 != 0
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square(((self.0 >> FROM_SHIFT) & 0x3F) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square(((self.0 >> TO_SHIFT) & 0x3F) as u8)
    }

    /// The moved piece. Only meaningful on a non-empty move.
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        match (self.0 >> PIECE_SHIFT) & 0x7 {
            1 => Piece::Pawn,
            2 => Piece::Knight,
            3 => Piece::Bishop,
            4 => Piece::Rook,
            5 => Piece::Queen,
            _ => Piece::King,
        }
    }

    #[inline]
    #[must_use]
    pub const fn move_type(self) -> u32 {
        (self.0 >> TYPE_SHIFT) & 0x7
    }

    /// Returns true if this move captures a piece (including en passant)
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        (self.0 >> CAPTURE_SHIFT) & 1 != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        self.move_type() == TYPE_PASSANT
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        let t = self.move_type();
        t == TYPE_KINGSIDE_CASTLING || t == TYPE_QUEENSIDE_CASTLING
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.move_type() >= TYPE_PROMOTION_QUEEN
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        match self.move_type() {
            TYPE_PROMOTION_QUEEN => Some(Piece::Queen),
            TYPE_PROMOTION_KNIGHT => Some(Piece::Knight),
            TYPE_PROMOTION_BISHOP => Some(Piece::Bishop),
            TYPE_PROMOTION_ROOK => Some(Piece::Rook),
            _ => None,
        }
    }

    /// Move type for promoting to `piece`
    #[inline]
    #[must_use]
    pub const fn promotion_type(piece: Piece) -> u32 {
        match piece {
            Piece::Knight => TYPE_PROMOTION_KNIGHT,
            Piece::Bishop => TYPE_PROMOTION_BISHOP,
            Piece::Rook => TYPE_PROMOTION_ROOK,
            _ => TYPE_PROMOTION_QUEEN,
        }
    }

    /// Captures and promotions; these never enter killer or history tables
    #[inline]
    #[must_use]
    pub const fn is_tactical(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Pawn move landing on the mover's 6th, 7th or 8th rank
    #[inline]
    #[must_use]
    pub const fn is_pawn_push_678(self) -> bool {
        if !matches!(self.piece(), Piece::Pawn) {
            return false;
        }
        let to = self.to();
        if to.0 > self.from().0 {
            to.rank() >= 5
        } else {
            to.rank() <= 2
        }
    }

    /// UCI long algebraic text (`e2e4`, `e7e8q`); `0000` for `NONE`
    #[must_use]
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "Move(none)");
        }
        write!(f, "Move({} {}{}", self.piece(), self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "={}", promo.to_char().to_ascii_uppercase())?;
        }
        if self.is_capture() {
            write!(f, " cap")?;
        }
        if self.is_castling() {
            write!(f, " castle")?;
        }
        if self.is_en_passant() {
            write!(f, " ep")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NONE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

/// A scored move for move ordering.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves, drained best-first by selection.
#[derive(Clone, Debug)]
pub struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    #[must_use]
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::NONE,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes and returns the highest-scored move.
    ///
    /// Selection rather than a full sort: O(n) per call, and most nodes cut
    /// off after a handful of moves. Ties resolve to the earliest pushed move.
    #[inline]
    pub fn pick_best(&mut self) -> Option<ScoredMove> {
        if self.len == 0 {
            return None;
        }
        let mut best_idx = 0;
        let mut best_score = self.moves[0].score;
        for i in 1..self.len {
            if self.moves[i].score > best_score {
                best_score = self.moves[i].score;
                best_idx = i;
            }
        }
        let best = self.moves[best_idx];
        // Shift down to keep insertion order among the remaining moves
        self.moves.copy_within(best_idx + 1..self.len, best_idx);
        self.len -= 1;
        Some(best)
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}
