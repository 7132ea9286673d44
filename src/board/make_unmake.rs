//! Make/unmake. Every move pushes a full snapshot, so undo is a copy back.

use super::state::HistoryEntry;
use super::{Bitboard, Board, Color, Move, Piece, Square};

impl Board {
    fn snapshot(&self, mv: Move, captured: Option<Piece>) -> HistoryEntry {
        HistoryEntry {
            pieces: self.pieces,
            colors: self.colors,
            turn: self.turn,
            castling: self.castling,
            en_passant: self.en_passant,
            check: self.check,
            fifty: self.fifty,
            key: self.key,
            mv,
            captured,
        }
    }

    #[inline]
    fn toggle_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[piece.index()] ^= bit;
        self.colors[color.index()] ^= bit;
        self.key[color.index()] ^= self.zobrist.piece(color, piece, sq);
    }

    fn set_castling(&mut self, rights: super::CastlingRights) {
        let changed = self.castling.as_u8() ^ rights.as_u8();
        for bit in 0..4 {
            if changed & (1 << bit) != 0 {
                self.key[bit / 2] ^= self.zobrist.castling(bit);
            }
        }
        self.castling = rights;
    }

    fn clear_en_passant(&mut self) {
        if let Some(ep) = self.en_passant.take() {
            self.key[self.turn.index()] ^= self.zobrist.en_passant(ep.file());
        }
    }

    /// Play `mv` for the side to move.
    ///
    /// The move must be pseudo-legal in the current position. If it leaves
    /// the mover's king attacked it is taken back immediately and `false` is
    /// returned; the board is then unchanged.
    pub fn do_move(&mut self, mv: Move) -> bool {
        if mv.is_none() {
            self.do_null_move();
            return true;
        }
        let us = self.turn;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();

        let captured = if mv.is_en_passant() {
            Some(Piece::Pawn)
        } else if mv.is_capture() {
            self.piece_at(to).map(|(_, p)| p)
        } else {
            None
        };
        self.history.push(self.snapshot(mv, captured));

        self.clear_en_passant();

        if let Some(victim) = captured {
            let victim_sq = if mv.is_en_passant() {
                match us {
                    Color::White => to.offset(-8),
                    Color::Black => to.offset(8),
                }
            } else {
                to
            };
            self.toggle_piece(victim_sq, them, victim);
        }

        self.toggle_piece(from, us, piece);
        match mv.promotion() {
            Some(promoted) => self.toggle_piece(to, us, promoted),
            None => self.toggle_piece(to, us, piece),
        }

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to);
            self.toggle_piece(rook_from, us, Piece::Rook);
            self.toggle_piece(rook_to, us, Piece::Rook);
        }

        let rights = self.castling.after_touching(from).after_touching(to);
        if rights != self.castling {
            self.set_castling(rights);
        }

        if piece == Piece::Pawn || captured.is_some() {
            self.fifty = 0;
        } else {
            self.fifty += 1;
        }

        self.turn = them;
        self.key[0] ^= self.zobrist.side();

        if piece == Piece::Pawn && from.0.abs_diff(to.0) == 16 {
            let ep = Square((from.0 + to.0) / 2);
            // Only worth recording if a pawn of the new side to move can take
            if (self.attacks.pawn(us, ep) & self.pieces_of(them, Piece::Pawn)).is_not_empty() {
                self.en_passant = Some(ep);
                self.key[them.index()] ^= self.zobrist.en_passant(ep.file());
            }
        }

        if self.king_attacked(us) {
            self.undo_move();
            return false;
        }
        self.check = self.king_attacked(them);
        true
    }

    /// Pass the turn: flips side to move and clears en passant.
    pub fn do_null_move(&mut self) {
        self.history.push(self.snapshot(Move::NONE, None));
        self.clear_en_passant();
        self.turn = self.turn.opponent();
        self.key[0] ^= self.zobrist.side();
        self.check = false;
        self.fifty += 1;
    }

    /// Take back the last `do_move` or `do_null_move`. No-op on an empty history.
    pub fn undo_move(&mut self) {
        if let Some(h) = self.history.pop() {
            self.restore(&h);
        }
    }

    /// Take back moves until `ply()` equals `ply`.
    pub fn undo_to(&mut self, ply: usize) {
        if ply < self.history.len() {
            let h = self.history[ply];
            self.history.truncate(ply);
            self.restore(&h);
        }
    }

    fn restore(&mut self, h: &HistoryEntry) {
        self.pieces = h.pieces;
        self.colors = h.colors;
        self.turn = h.turn;
        self.castling = h.castling;
        self.en_passant = h.en_passant;
        self.check = h.check;
        self.fifty = h.fifty;
        self.key = h.key;
    }
}

/// Rook origin and destination for a castling move landing the king on `king_to`
pub(crate) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        _ => (Square::A8, Square::D8),
    }
}
