//! Pseudo-legal move generation.
//!
//! Moves are produced per piece type and may leave the mover's own king in
//! check. `legal.rs` filters them through `do_move`/`undo_move`, which is the
//! only legality test in the crate.

mod kings;
mod knights;
mod legal;
mod pawns;
mod sliders;

use super::{Bitboard, Board, Move, MoveList, Piece, Square, TYPE_NORMAL};

/// Which slice of the pseudo-legal moves to produce.
///
/// `Tactical` and `Quiet` partition `All`: captures and queen promotions on
/// one side; quiet moves, castling and under-promotions on the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    All,
    Tactical,
    Quiet,
}

impl GenType {
    #[inline]
    fn wants_tactical(self) -> bool {
        self != GenType::Quiet
    }

    #[inline]
    fn wants_quiet(self) -> bool {
        self != GenType::Tactical
    }
}

impl Board {
    /// Append the pseudo-legal moves of the side to move to `list`.
    pub fn generate_moves(&self, kind: GenType, list: &mut MoveList) {
        self.generate_pawn_moves(kind, list);
        self.generate_knight_moves(kind, list);
        self.generate_slider_moves(kind, list);
        self.generate_king_moves(kind, list);
    }

    /// All pseudo-legal moves of the side to move.
    #[must_use]
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.generate_moves(GenType::All, &mut list);
        list
    }

    /// Squares a non-pawn piece may land on for this generation kind
    fn target_mask(&self, kind: GenType) -> Bitboard {
        match kind {
            GenType::All => !self.mine(),
            GenType::Tactical => self.others(),
            GenType::Quiet => !self.occupied(),
        }
    }

    fn push_piece_moves(&self, list: &mut MoveList, from: Square, piece: Piece, targets: Bitboard) {
        let others = self.others();
        for to in targets {
            list.push(Move::new(from, to, piece, others.contains(to), TYPE_NORMAL));
        }
    }
}
