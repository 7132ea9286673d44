//! Errors for reading positions, squares and move text.
//!
//! None of these leave a board half-updated: `set_fen` builds the new
//! position aside and the move parsers never play anything on failure.

use std::fmt;

/// A FEN string that cannot be turned into a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// No piece placement field
    Empty,
    /// Not one of `pnbrqkPNBRQK` or a digit in the placement field
    InvalidPiece { char: char },
    /// Not one of `KQkq` or `-` in the castling field
    InvalidCastling { char: char },
    InvalidSideToMove { found: String },
    InvalidEnPassant { found: String },
    /// The placement field does not have eight `/`-separated ranks
    WrongRankCount { found: usize },
    /// A rank describes more than eight squares. `rank` is the board rank, 8 to 1.
    TooManyFiles { rank: usize, files: usize },
    /// `field` is `"halfmove clock"` or `"fullmove number"`
    InvalidClock { field: &'static str, found: String },
    /// Each side needs exactly one king for check detection to work
    KingCount { color: char, found: u32 },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::Empty => write!(f, "FEN has no piece placement"),
            FenError::InvalidPiece { char } => {
                write!(f, "piece placement contains '{char}', not a piece or square count")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "castling field contains '{char}', expected some of KQkq or '-'")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "side to move is '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "en passant target '{found}' is neither a square nor '-'")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "piece placement has {found} ranks instead of 8")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "rank {rank} describes {files} squares instead of 8")
            }
            FenError::InvalidClock { field, found } => {
                write!(f, "{field} '{found}' is not a non-negative number")
            }
            FenError::KingCount { color, found } => {
                write!(f, "side '{color}' has {found} kings, a position needs exactly one")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// UCI move text (`e2e4`, `a7a8q`) that does not name a legal move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    InvalidLength { len: usize },
    InvalidSquare { notation: String },
    /// Promotions are written with one of `n`, `b`, `r`, `q`
    InvalidPromotion { char: char },
    /// Well formed, but not a legal move in this position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "UCI move has {len} characters, expected 4 or 5")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "UCI move '{notation}' does not start with two squares")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "cannot promote to '{char}', expected one of nbrq")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "'{notation}' is not a legal move here")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// A square given by coordinates or algebraic name that is off the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank index, 0 for the first rank
    RankOutOfBounds { rank: u8 },
    /// File index, 0 for the a-file
    FileOutOfBounds { file: u8 },
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "rank index {rank} is off the board (0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "file index {file} is off the board (0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "'{notation}' is not a square name like e4")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// SAN text that does not match exactly one legal move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Nothing left after stripping check and annotation marks
    Empty,
    InvalidPiece { char: char },
    InvalidSquare { notation: String },
    /// Several legal moves fit; the text needs a file or rank hint
    AmbiguousMove { san: String },
    NoMatchingMove { san: String },
    InvalidPromotion { char: char },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "SAN move is empty"),
            SanError::InvalidPiece { char } => {
                write!(f, "SAN piece letter '{char}' is not one of KQRBN")
            }
            SanError::InvalidSquare { notation } => {
                write!(f, "SAN move '{notation}' has no valid destination square")
            }
            SanError::AmbiguousMove { san } => {
                write!(f, "'{san}' fits more than one legal move")
            }
            SanError::NoMatchingMove { san } => {
                write!(f, "'{san}' fits no legal move")
            }
            SanError::InvalidPromotion { char } => {
                write!(f, "cannot promote to '{char}', expected one of NBRQ")
            }
        }
    }
}

impl std::error::Error for SanError {}
