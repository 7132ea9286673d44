use super::super::{Board, MoveList, Piece};
use super::GenType;

impl Board {
    pub(super) fn generate_knight_moves(&self, kind: GenType, list: &mut MoveList) {
        let targets = self.target_mask(kind);
        for from in self.pieces_of(self.turn, Piece::Knight) {
            let attacks = self.attacks.knight(from) & targets;
            self.push_piece_moves(list, from, Piece::Knight, attacks);
        }
    }
}
