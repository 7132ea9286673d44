//! Chess board representation and game logic.
//!
//! Bitboard position with incremental two-word Zobrist keys and a full
//! snapshot history, so every move can be taken back exactly.
//!
//! # Example
//! ```
//! use carbon_chess::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.legal_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod attack_tables;
mod error;
mod fen;
mod make_unmake;
mod movegen;
mod san;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attack_tables::AttackTables;
pub use error::{FenError, MoveParseError, SanError, SquareError};
pub use fen::START_FEN;
pub use movegen::GenType;
pub use see::SEE_PIECE_VALUES;
pub use state::{Board, GameState, MAX_MOVES};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, Piece, ScoredMove,
    ScoredMoveList, Square, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
    MOVE_MASK, TYPE_KINGSIDE_CASTLING, TYPE_NORMAL, TYPE_PASSANT, TYPE_PROMOTION_BISHOP,
    TYPE_PROMOTION_KNIGHT, TYPE_PROMOTION_QUEEN, TYPE_PROMOTION_ROOK, TYPE_QUEENSIDE_CASTLING,
};

