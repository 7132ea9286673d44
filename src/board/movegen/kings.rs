use super::super::{
    Bitboard, Board, Color, Move, MoveList, Piece, Square, TYPE_KINGSIDE_CASTLING,
    TYPE_QUEENSIDE_CASTLING,
};
use super::GenType;

/// Castling geometry for one side: squares that must be empty and squares the
/// king passes through (origin included) that must not be attacked.
struct CastlePath {
    kingside: bool,
    king_to: Square,
    empty: Bitboard,
    safe: [Square; 3],
    move_type: u32,
}

const fn bb(squares: &[u8]) -> Bitboard {
    let mut bits = 0u64;
    let mut i = 0;
    while i < squares.len() {
        bits |= 1u64 << squares[i];
        i += 1;
    }
    Bitboard(bits)
}

const WHITE_PATHS: [CastlePath; 2] = [
    CastlePath {
        kingside: true,
        king_to: Square::G1,
        empty: bb(&[5, 6]),
        safe: [Square::E1, Square::F1, Square::G1],
        move_type: TYPE_KINGSIDE_CASTLING,
    },
    CastlePath {
        kingside: false,
        king_to: Square::C1,
        empty: bb(&[1, 2, 3]),
        safe: [Square::E1, Square::D1, Square::C1],
        move_type: TYPE_QUEENSIDE_CASTLING,
    },
];

const BLACK_PATHS: [CastlePath; 2] = [
    CastlePath {
        kingside: true,
        king_to: Square::G8,
        empty: bb(&[61, 62]),
        safe: [Square::E8, Square::F8, Square::G8],
        move_type: TYPE_KINGSIDE_CASTLING,
    },
    CastlePath {
        kingside: false,
        king_to: Square::C8,
        empty: bb(&[57, 58, 59]),
        safe: [Square::E8, Square::D8, Square::C8],
        move_type: TYPE_QUEENSIDE_CASTLING,
    },
];

impl Board {
    pub(super) fn generate_king_moves(&self, kind: GenType, list: &mut MoveList) {
        let us = self.turn;
        let Some(from) = self.king_square(us) else {
            return;
        };
        let attacks = self.attacks.king(from) & self.target_mask(kind);
        self.push_piece_moves(list, from, Piece::King, attacks);

        if kind.wants_quiet() && !self.check {
            self.generate_castling(us, from, list);
        }
    }

    fn generate_castling(&self, us: Color, from: Square, list: &mut MoveList) {
        let paths = match us {
            Color::White => &WHITE_PATHS,
            Color::Black => &BLACK_PATHS,
        };
        let occupied = self.occupied();
        let them = us.opponent();
        for path in paths {
            if !self.castling.has(us, path.kingside) || from != path.safe[0] {
                continue;
            }
            if (occupied & path.empty).is_not_empty() {
                continue;
            }
            if path.safe.iter().any(|&sq| self.is_square_attacked(sq, them)) {
                continue;
            }
            list.push(Move::new(from, path.king_to, Piece::King, false, path.move_type));
        }
    }
}
