//! Core chess types.
//!
//! - `Piece` and `Color` - chess piece types and colors
//! - `Square` - board square as a 0-63 index
//! - `Bitboard` - 64-bit square set
//! - `Move` and `MoveList` - packed move representation
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::{
    CastlingRights, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
};
pub use moves::{
    Move, MoveList, ScoredMove, ScoredMoveList, MOVE_MASK, TYPE_KINGSIDE_CASTLING, TYPE_NORMAL,
    TYPE_PASSANT, TYPE_PROMOTION_BISHOP, TYPE_PROMOTION_KNIGHT, TYPE_PROMOTION_QUEEN,
    TYPE_PROMOTION_ROOK, TYPE_QUEENSIDE_CASTLING,
};
pub use piece::{Color, Piece};
pub use square::Square;

