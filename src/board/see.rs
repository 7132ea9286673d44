//! Static Exchange Evaluation (SEE).
//!
//! Plays out every capture on one square, cheapest attacker first, and
//! backs the material balance up with a negamax over the gain list.

use super::types::{Bitboard, Move, Piece};
use super::Board;

/// Exchange values by piece index (pawn .. king)
pub const SEE_PIECE_VALUES: [i32; 6] = [100, 325, 330, 500, 975, 9999];

/// Exchanges never run longer than the number of pieces that fit around a square
const MAX_EXCHANGES: usize = 32;

impl Board {
    /// Net material the side to move wins by playing `mv` if both sides
    /// then recapture on the destination square optimally.
    ///
    /// Positive means winning, negative losing, zero an even trade. For a
    /// non-capture this is zero or the loss of the moved piece. The board is
    /// read only.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        let to = mv.to();
        let captured = if mv.is_en_passant() {
            Some(Piece::Pawn)
        } else {
            self.piece_at(to).map(|(_, p)| p)
        };

        let pawns = self.pieces[Piece::Pawn.index()];
        let diagonal = self.pieces[Piece::Bishop.index()] | self.pieces[Piece::Queen.index()];
        let straight = self.pieces[Piece::Rook.index()] | self.pieces[Piece::Queen.index()];
        let may_xray = pawns | diagonal | straight;

        let mut occupied = self.occupied();
        let mut attackers = self.attackers_to(to, occupied);
        let mut from_bb = Bitboard::from_square(mv.from());
        let mut moved = mv.piece();

        let mut gain = [0i32; MAX_EXCHANGES];
        gain[0] = captured.map_or(0, |p| SEE_PIECE_VALUES[p.index()]);
        let mut d = 0;

        loop {
            // After d captures it is the opponent's turn when d is even
            let side = if d % 2 == 0 { self.others() } else { self.mine() };
            d += 1;
            gain[d] = SEE_PIECE_VALUES[moved.index()] - gain[d - 1];

            attackers &= !from_bb;
            occupied &= !from_bb;
            if (from_bb & may_xray).is_not_empty() {
                attackers |= self
                    .attacks
                    .xray_attacks(to, occupied, diagonal, straight)
                    & occupied;
            }

            let Some((piece, candidates)) = Piece::ALL.into_iter().find_map(|p| {
                let c = attackers & side & self.pieces[p.index()];
                c.is_not_empty().then_some((p, c))
            }) else {
                break;
            };
            if d + 1 >= MAX_EXCHANGES {
                break;
            }
            moved = piece;
            from_bb = candidates.lowest();
        }

        while d > 1 {
            d -= 1;
            gain[d - 1] = -(-gain[d - 1]).max(gain[d]);
        }
        gain[0]
    }
}
