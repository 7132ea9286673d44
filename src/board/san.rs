//! Standard Algebraic Notation (SAN).
//!
//! Output follows the usual conventions: piece letter, the minimal
//! disambiguation among legal moves, `x` for captures, `=Q` for promotions and
//! a `+` or `#` suffix. Input is lenient: `0-0`, bare promotion letters and
//! annotation glyphs are accepted.
//!
//! # Examples
//! ```
//! use carbon_chess::board::Board;
//!
//! let mut board = Board::new();
//! let mv = board.parse_san("e4").unwrap();
//! assert_eq!(board.to_san(mv), "e4");
//! ```

use super::error::SanError;
use super::{Board, Move, Piece, Square};

/// Parsed pieces of a SAN token, before matching against the legal moves
struct SanParts {
    piece: Piece,
    from_file: Option<u8>,
    from_rank: Option<u8>,
    to: Square,
    promotion: Option<Piece>,
}

impl Board {
    /// Format a legal move in SAN, including the check or mate suffix.
    pub fn to_san(&mut self, mv: Move) -> String {
        let mut san = String::new();

        if mv.is_castling() {
            san.push_str(if mv.to().file() == 6 { "O-O" } else { "O-O-O" });
        } else {
            let piece = mv.piece();
            if piece == Piece::Pawn {
                if mv.is_capture() {
                    san.push((b'a' + mv.from().file()) as char);
                }
            } else {
                san.push(piece.to_char().to_ascii_uppercase());
                let (file, rank) = self.disambiguation(mv);
                if file {
                    san.push((b'a' + mv.from().file()) as char);
                }
                if rank {
                    san.push((b'1' + mv.from().rank()) as char);
                }
            }
            if mv.is_capture() {
                san.push('x');
            }
            san.push_str(&mv.to().to_string());
            if let Some(promo) = mv.promotion() {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        if self.do_move(mv) {
            if self.check {
                san.push(if self.has_legal_move() { '+' } else { '#' });
            }
            self.undo_move();
        }
        san
    }

    /// Which parts of the origin square SAN needs to tell `mv` apart from
    /// other legal moves of the same piece type to the same square.
    fn disambiguation(&mut self, mv: Move) -> (bool, bool) {
        let rivals: Vec<Move> = self
            .legal_moves()
            .iter()
            .copied()
            .filter(|m| m.to() == mv.to() && m.piece() == mv.piece() && m.from() != mv.from())
            .collect();
        if rivals.is_empty() {
            return (false, false);
        }
        let same_file = rivals.iter().any(|m| m.from().file() == mv.from().file());
        let same_rank = rivals.iter().any(|m| m.from().rank() == mv.from().rank());
        match (same_file, same_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// Find the legal move written as `san`.
    pub fn parse_san(&mut self, san: &str) -> Result<Move, SanError> {
        let token = san
            .trim()
            .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'));
        if token.is_empty() {
            return Err(SanError::Empty);
        }

        let legal = self.legal_moves();
        match token {
            "O-O" | "0-0" | "O-O-O" | "0-0-0" => {
                let file = if token.len() == 3 { 6 } else { 2 };
                return legal
                    .iter()
                    .copied()
                    .find(|m| m.is_castling() && m.to().file() == file)
                    .ok_or_else(|| SanError::NoMatchingMove { san: token.to_string() });
            }
            _ => {}
        }

        let parts = split_san(token)?;
        let mut found = legal.iter().copied().filter(|m| {
            m.to() == parts.to
                && m.piece() == parts.piece
                && m.promotion() == parts.promotion
                && parts.from_file.map_or(true, |f| m.from().file() == f)
                && parts.from_rank.map_or(true, |r| m.from().rank() == r)
        });
        match (found.next(), found.next()) {
            (Some(mv), None) => Ok(mv),
            (None, _) => Err(SanError::NoMatchingMove { san: token.to_string() }),
            (Some(_), Some(_)) => Err(SanError::AmbiguousMove { san: token.to_string() }),
        }
    }

    /// Parse a SAN move and play it.
    pub fn play_san(&mut self, san: &str) -> Result<Move, SanError> {
        let mv = self.parse_san(san)?;
        self.do_move(mv);
        Ok(mv)
    }
}

fn split_san(token: &str) -> Result<SanParts, SanError> {
    let mut chars: Vec<char> = token.chars().collect();

    let piece = match chars.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            chars.remove(0);
            Piece::from_char(c).ok_or(SanError::InvalidPiece { char: c })?
        }
        _ => Piece::Pawn,
    };

    // Trailing promotion, with or without '='
    let mut promotion = None;
    if let Some(&last) = chars.last() {
        // A destination always ends in a digit, so any trailing letter is a promotion
        if last.is_ascii_alphabetic() {
            let promo = Piece::from_char(last)
                .filter(|p| !matches!(p, Piece::Pawn | Piece::King))
                .ok_or(SanError::InvalidPromotion { char: last })?;
            promotion = Some(promo);
            chars.pop();
            if chars.last() == Some(&'=') {
                chars.pop();
            }
        }
    }

    if chars.len() < 2 {
        return Err(SanError::InvalidSquare { notation: chars.iter().collect() });
    }
    let dest: String = chars[chars.len() - 2..].iter().collect();
    let to = dest
        .parse::<Square>()
        .map_err(|_| SanError::InvalidSquare { notation: dest.clone() })?;

    let mut from_file = None;
    let mut from_rank = None;
    for &c in &chars[..chars.len() - 2] {
        match c {
            'a'..='h' => from_file = Some(c as u8 - b'a'),
            '1'..='8' => from_rank = Some(c as u8 - b'1'),
            'x' | ':' | '-' => {}
            _ => return Err(SanError::InvalidSquare { notation: token.to_string() }),
        }
    }

    Ok(SanParts { piece, from_file, from_rank, to, promotion })
}
