use super::super::{Board, MoveList, Piece};
use super::GenType;

impl Board {
    pub(super) fn generate_slider_moves(&self, kind: GenType, list: &mut MoveList) {
        let targets = self.target_mask(kind);
        let occupied = self.occupied();
        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
            for from in self.pieces_of(self.turn, piece) {
                let attacks = match piece {
                    Piece::Bishop => self.attacks.bishop(from, occupied),
                    Piece::Rook => self.attacks.rook(from, occupied),
                    _ => self.attacks.queen(from, occupied),
                };
                self.push_piece_moves(list, from, piece, attacks & targets);
            }
        }
    }
}
