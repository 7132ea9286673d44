use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, CastlingRights, Color, Move, Piece, Square};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a position from FEN with the shared tables.
    ///
    /// Only the board layout is required. Missing fields default to white to
    /// move, castling rights wherever king and rook still stand on their
    /// original squares, no en passant square and zeroed clocks.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::new();
        board.set_fen(fen)?;
        Ok(board)
    }

    /// Replace the position, keeping this board's tables. On error the board is unchanged.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let mut board = Board::empty(self.attacks.clone(), self.zobrist.clone());
        let mut parts = fen.split_whitespace();
        let layout = parts.next().ok_or(FenError::Empty)?;

        let ranks: Vec<&str> = layout.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank: 8 - rank_idx,
                            files: file + 1,
                        });
                    }
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    board.put_piece(Square::new(rank, file as u8), color, piece);
                    file += 1;
                }
            }
            if file > 8 {
                return Err(FenError::TooManyFiles {
                    rank: 8 - rank_idx,
                    files: file,
                });
            }
        }
        for (color, c) in [(Color::White, 'w'), (Color::Black, 'b')] {
            let found = board.pieces_of(color, Piece::King).popcount();
            if found != 1 {
                return Err(FenError::KingCount { color: c, found });
            }
        }

        board.turn = match parts.next() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        board.castling = match parts.next() {
            Some(field) => parse_castling(field)?,
            None => board.inferred_castling(),
        };
        // Rights without the pieces in place would let movegen castle a ghost rook
        board.castling = board.castling.intersection(board.inferred_castling());

        if let Some(field) = parts.next() {
            if field != "-" {
                let ep: Square = field.parse().map_err(|_| FenError::InvalidEnPassant {
                    found: field.to_string(),
                })?;
                let capturers = board.attacks.pawn(board.turn.opponent(), ep)
                    & board.pieces_of(board.turn, Piece::Pawn);
                if capturers.is_not_empty() {
                    board.en_passant = Some(ep);
                }
            }
        }

        if let Some(field) = parts.next() {
            board.fifty = field.parse().map_err(|_| FenError::InvalidClock {
                field: "halfmove clock",
                found: field.to_string(),
            })?;
        }
        let fullmove: u32 = match parts.next() {
            Some(field) => field.parse().map_err(|_| FenError::InvalidClock {
                field: "fullmove number",
                found: field.to_string(),
            })?,
            None => 1,
        };
        board.initial_ply = fullmove.max(1).saturating_sub(1) * 2 + board.turn.index() as u32;

        board.check = board.king_attacked(board.turn);
        board.key = board.zobrist.fully_recompute(&board);
        *self = board;
        Ok(())
    }

    /// Rights implied by kings and rooks standing on their original squares
    fn inferred_castling(&self) -> CastlingRights {
        let mut rights = CastlingRights::none();
        let at = |sq: Square, color: Color, piece: Piece| {
            self.pieces_of(color, piece).contains(sq)
        };
        if at(Square::E1, Color::White, Piece::King) {
            if at(Square::H1, Color::White, Piece::Rook) {
                rights.set(Color::White, true);
            }
            if at(Square::A1, Color::White, Piece::Rook) {
                rights.set(Color::White, false);
            }
        }
        if at(Square::E8, Color::Black, Piece::King) {
            if at(Square::H8, Color::Black, Piece::Rook) {
                rights.set(Color::Black, true);
            }
            if at(Square::A8, Color::Black, Piece::Rook) {
                rights.set(Color::Black, false);
            }
        }
        rights
    }

    /// Convert the board position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                if let Some((color, piece)) = self.piece_at(Square::new(rank, file)) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let mut castling = String::new();
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.castling.has(color, kingside) {
                castling.push(c);
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            self.turn,
            castling,
            ep,
            self.fifty,
            self.fullmove_number()
        )
    }

    /// Find the legal move written in UCI long algebraic notation (`e2e4`, `e7e8q`).
    ///
    /// # Example
    /// ```
    /// use carbon_chess::board::Board;
    ///
    /// let mut board = Board::new();
    /// let mv = board.parse_uci("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 || !uci.is_ascii() {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match uci[4..].chars().next() {
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
            None => None,
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
            .ok_or(MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse and play a UCI move.
    ///
    /// # Example
    /// ```
    /// use carbon_chess::board::Board;
    ///
    /// let mut board = Board::new();
    /// board.play_uci("e2e4").unwrap();
    /// board.play_uci("e7e5").unwrap();
    /// ```
    pub fn play_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_uci(uci)?;
        self.do_move(mv);
        Ok(mv)
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    for c in field.chars() {
        match c {
            'K' => rights.set(Color::White, true),
            'Q' => rights.set(Color::White, false),
            'k' => rights.set(Color::Black, true),
            'q' => rights.set(Color::Black, false),
            '-' => {}
            _ => return Err(FenError::InvalidCastling { char: c }),
        }
    }
    Ok(rights)
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_round_trip() {
        let board = Board::from_fen(START_FEN).unwrap();
        assert_eq!(board.to_fen(), START_FEN);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_fen_black_to_move_with_capturable_en_passant() {
        let fen = "rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.en_passant_square(), Some("e3".parse().unwrap()));
        assert_eq!(board.to_fen(), fen);
    }

    #[test]
    fn test_fen_drops_uncapturable_en_passant() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(board.en_passant_square(), None);
    }

    #[test]
    fn test_partial_fen_defaults() {
        let board = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.castling_rights(), CastlingRights::all());
        assert_eq!(board.fifty_move_counter(), 0);
        assert_eq!(board.to_fen(), START_FEN);
    }

    #[test]
    fn test_partial_fen_infers_only_possible_rights() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K1R1 w").unwrap();
        assert!(board.castling_rights().has(Color::White, false));
        assert!(!board.castling_rights().has(Color::White, true));
        assert!(!board.castling_rights().has(Color::Black, true));
    }

    #[test]
    fn test_fen_errors() {
        assert!(matches!(Board::from_fen(""), Err(FenError::Empty)));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w"),
            Err(FenError::WrongRankCount { found: 7 })
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiece { char: 'x' })
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenError::InvalidSideToMove { .. })
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XQkq - 0 1"),
            Err(FenError::InvalidCastling { char: 'X' })
        ));
        assert!(matches!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq z9 0 1"),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(matches!(
            Board::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenError::KingCount { color: 'b', found: 0 })
        ));
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
            Err(FenError::InvalidClock { .. })
        ));
    }

    #[test]
    fn test_set_fen_error_leaves_board_untouched() {
        let mut board = Board::new();
        board.play_uci("e2e4").unwrap();
        let before = board.to_fen();
        assert!(board.set_fen("garbage").is_err());
        assert_eq!(board.to_fen(), before);
        assert_eq!(board.ply(), 1);
    }

    #[test]
    fn test_move_counters() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 42 17").unwrap();
        assert_eq!(board.fifty_move_counter(), 42);
        assert_eq!(board.fullmove_number(), 17);
        assert_eq!(board.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 42 17");
    }

    #[test]
    fn test_check_flag_from_fen() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap();
        assert!(board.in_check());
    }

    #[test]
    fn test_parse_uci() {
        let mut board = Board::new();
        let mv = board.parse_uci("e2e4").unwrap();
        assert_eq!(mv.from(), Square::new(1, 4));
        assert_eq!(mv.to(), Square::new(3, 4));
        assert_eq!(mv.piece(), Piece::Pawn);

        let mut promo = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        assert_eq!(promo.parse_uci("a7a8q").unwrap().promotion(), Some(Piece::Queen));
        assert_eq!(promo.parse_uci("a7a8n").unwrap().promotion(), Some(Piece::Knight));
    }

    #[test]
    fn test_parse_uci_errors() {
        let mut board = Board::new();
        assert!(matches!(
            board.parse_uci("e2"),
            Err(MoveParseError::InvalidLength { .. })
        ));
        assert!(matches!(
            board.parse_uci("z9z9"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(matches!(
            board.parse_uci("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        let mut promo = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
        assert!(matches!(
            promo.parse_uci("a7a8p"),
            Err(MoveParseError::InvalidPromotion { char: 'p' })
        ));
    }

    #[test]
    fn test_fullmove_advances_after_black_moves() {
        let mut board = Board::new();
        board.play_uci("e2e4").unwrap();
        board.play_uci("e7e5").unwrap();
        assert!(board.to_fen().ends_with(" 0 2"));
    }
}
