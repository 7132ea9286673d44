use super::super::{
    Bitboard, Board, Color, Move, MoveList, Piece, Square, TYPE_NORMAL, TYPE_PASSANT,
};
use super::GenType;

impl Board {
    pub(super) fn generate_pawn_moves(&self, kind: GenType, list: &mut MoveList) {
        let us = self.turn;
        let pawns = self.pieces_of(us, Piece::Pawn);
        if pawns.is_empty() {
            return;
        }
        let empty = !self.occupied();
        let others = self.others();
        let promotion_rank = Bitboard::rank_mask(us.promotion_rank());
        let (single, double_rank, back) = match us {
            Color::White => (pawns.shift_north() & empty, Bitboard::RANK_3, -8i8),
            Color::Black => (pawns.shift_south() & empty, Bitboard::RANK_6, 8i8),
        };
        let double = match us {
            Color::White => (single & double_rank).shift_north() & empty,
            Color::Black => (single & double_rank).shift_south() & empty,
        };

        if kind.wants_quiet() {
            for to in single & !promotion_rank {
                list.push(Move::new(to.offset(back), to, Piece::Pawn, false, TYPE_NORMAL));
            }
            for to in double {
                list.push(Move::new(to.offset(2 * back), to, Piece::Pawn, false, TYPE_NORMAL));
            }
        }
        for to in single & promotion_rank {
            push_promotions(list, kind, to.offset(back), to, false);
        }

        for from in pawns {
            let attacks = self.attacks.pawn(us, from);
            for to in attacks & others {
                if promotion_rank.contains(to) {
                    push_promotions(list, kind, from, to, true);
                } else if kind.wants_tactical() {
                    list.push(Move::new(from, to, Piece::Pawn, true, TYPE_NORMAL));
                }
            }
            if kind.wants_tactical() {
                if let Some(ep) = self.en_passant {
                    if attacks.contains(ep) {
                        list.push(Move::new(from, ep, Piece::Pawn, true, TYPE_PASSANT));
                    }
                }
            }
        }
    }
}

/// Queen promotions count as tactical, the rest are generated with quiet moves.
fn push_promotions(list: &mut MoveList, kind: GenType, from: Square, to: Square, capture: bool) {
    if kind.wants_tactical() {
        list.push(Move::new(from, to, Piece::Pawn, capture, Move::promotion_type(Piece::Queen)));
    }
    if kind.wants_quiet() {
        for piece in [Piece::Knight, Piece::Rook, Piece::Bishop] {
            list.push(Move::new(from, to, Piece::Pawn, capture, Move::promotion_type(piece)));
        }
    }
}
