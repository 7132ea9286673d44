//! Zobrist hashing for chess positions.
//!
//! A position hashes to two words: word 0 accumulates white's features
//! (white pieces, white castling rights, the side-to-move key) and word 1
//! black's. The TT derives its slot index from both words and stores a
//! differently mixed value as verifier, so a false hit needs both words to
//! collide.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Board, Color, Piece, Square};

static DEFAULT_KEYS: Lazy<Arc<ZobristKeys>> = Lazy::new(|| Arc::new(ZobristKeys::new()));

/// Fixed pseudo-random constants for every hashed position feature.
#[derive(Clone, Debug)]
pub struct ZobristKeys {
    // pieces[color][piece][square]
    pieces: [[[u64; 64]; 6]; 2],
    // castling[bit]: white kingside, white queenside, black kingside, black queenside
    castling: [u64; 4],
    // en_passant[file]
    en_passant: [u64; 8],
    side: u64,
    // mixed into the TT index while searching with a move excluded
    exclusion: u64,
}

impl ZobristKeys {
    /// Keys from the fixed default seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(1_234_567_890)
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color in &mut pieces {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let mut castling = [0u64; 4];
        for key in &mut castling {
            *key = rng.gen();
        }
        let mut en_passant = [0u64; 8];
        for key in &mut en_passant {
            *key = rng.gen();
        }
        ZobristKeys {
            pieces,
            castling,
            en_passant,
            side: rng.gen(),
            exclusion: rng.gen(),
        }
    }

    /// The process-wide instance, built on first use.
    #[must_use]
    pub fn shared() -> Arc<ZobristKeys> {
        Arc::clone(&DEFAULT_KEYS)
    }

    #[inline]
    #[must_use]
    pub fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.pieces[color.index()][piece.index()][sq.index()]
    }

    /// Key for castling right `bit` (0..4, same order as `CastlingRights` bits)
    #[inline]
    #[must_use]
    pub fn castling(&self, bit: usize) -> u64 {
        self.castling[bit]
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self, file: u8) -> u64 {
        self.en_passant[file as usize]
    }

    /// XORed into word 0 while black is to move
    #[inline]
    #[must_use]
    pub fn side(&self) -> u64 {
        self.side
    }

    #[inline]
    #[must_use]
    pub fn exclusion(&self) -> u64 {
        self.exclusion
    }

    /// Hash `board` from scratch.
    ///
    /// Only for verifying the incremental key; far too slow for the search.
    #[must_use]
    pub fn fully_recompute(&self, board: &Board) -> [u64; 2] {
        let mut key = [0u64; 2];
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in board.pieces_of(color, piece) {
                    key[color.index()] ^= self.piece(color, piece, sq);
                }
            }
        }
        let rights = board.castling_rights();
        for bit in 0..4 {
            if rights.has_bit(bit) {
                key[bit / 2] ^= self.castling(bit);
            }
        }
        if let Some(ep) = board.en_passant_square() {
            key[board.side_to_move().index()] ^= self.en_passant(ep.file());
        }
        if board.side_to_move() == Color::Black {
            key[0] ^= self.side;
        }
        key
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        ZobristKeys::new()
    }
}
