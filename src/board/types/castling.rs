//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use super::square::Square;

pub const CASTLE_WHITE_K: u8 = 1 << 0;
pub const CASTLE_WHITE_Q: u8 = 1 << 1;
pub const CASTLE_BLACK_K: u8 = 1 << 2;
pub const CASTLE_BLACK_Q: u8 = 1 << 3;

const ALL_CASTLING_RIGHTS: u8 = CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Castling rights represented as a bitmask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Test by bit position (0 = white kingside ... 3 = black queenside)
    #[inline]
    #[must_use]
    pub const fn has_bit(self, bit: usize) -> bool {
        self.0 & (1 << bit) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Rights lost when a piece leaves or lands on `sq`
    #[inline]
    #[must_use]
    pub const fn after_touching(self, sq: Square) -> Self {
        let lost = match sq {
            Square::E1 => CASTLE_WHITE_K | CASTLE_WHITE_Q,
            Square::H1 => CASTLE_WHITE_K,
            Square::A1 => CASTLE_WHITE_Q,
            Square::E8 => CASTLE_BLACK_K | CASTLE_BLACK_Q,
            Square::H8 => CASTLE_BLACK_K,
            Square::A8 => CASTLE_BLACK_Q,
            _ => 0,
        };
        CastlingRights(self.0 & !lost)
    }

    /// Rights present in both sets
    #[inline]
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        CastlingRights(self.0 & other.0)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_and_king_squares_strip_rights() {
        let all = CastlingRights::all();
        let after_h1 = all.after_touching(Square::H1);
        assert!(!after_h1.has(Color::White, true));
        assert!(after_h1.has(Color::White, false));
        let after_e8 = all.after_touching(Square::E8);
        assert!(!after_e8.has(Color::Black, true));
        assert!(!after_e8.has(Color::Black, false));
        assert_eq!(all.after_touching(Square(27)), all);
    }
}
