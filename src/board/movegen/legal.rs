//! Legality through make/unmake.

use super::super::{Board, Move, MoveList, Piece};
use super::GenType;

impl Board {
    /// Every legal move of the side to move.
    ///
    /// Each pseudo-legal move is played and taken back; the ones `do_move`
    /// accepts are kept. The board is unchanged on return.
    pub fn legal_moves(&mut self) -> MoveList {
        let pseudo = self.pseudo_legal_moves();
        let mut legal = MoveList::new();
        for &mv in &pseudo {
            if self.do_move(mv) {
                self.undo_move();
                legal.push(mv);
            }
        }
        legal
    }

    /// `true` as soon as one legal move is found.
    pub fn has_legal_move(&mut self) -> bool {
        let pseudo = self.pseudo_legal_moves();
        for &mv in &pseudo {
            if self.do_move(mv) {
                self.undo_move();
                return true;
            }
        }
        false
    }

    /// Whether `mv` is one of the pseudo-legal moves of this position.
    ///
    /// Used to vet moves that come from somewhere other than the generator
    /// (hash table, killer slots) before they are played.
    #[must_use]
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_none() {
            return false;
        }
        let Some((color, piece)) = self.piece_at(mv.from()) else {
            return false;
        };
        if color != self.turn || piece != mv.piece() {
            return false;
        }
        // Under-promotions are quiet even when they capture
        let kind = if mv.promotion().map_or(mv.is_capture(), |p| p == Piece::Queen) {
            GenType::Tactical
        } else {
            GenType::Quiet
        };
        let mut list = MoveList::new();
        self.generate_moves(kind, &mut list);
        list.contains(mv)
    }

    /// Whether the legal move `mv` gives check.
    pub fn gives_check(&mut self, mv: Move) -> bool {
        if self.do_move(mv) {
            let check = self.check;
            self.undo_move();
            check
        } else {
            false
        }
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let pseudo = self.pseudo_legal_moves();
        let mut nodes = 0;
        for &mv in &pseudo {
            if self.do_move(mv) {
                nodes += if depth == 1 { 1 } else { self.perft(depth - 1) };
                self.undo_move();
            }
        }
        nodes
    }

    /// Perft split by root move, in UCI notation.
    pub fn perft_divide(&mut self, depth: u32) -> Vec<(String, u64)> {
        let mut out = Vec::new();
        if depth == 0 {
            return out;
        }
        let moves = self.legal_moves();
        for &mv in &moves {
            self.do_move(mv);
            out.push((mv.to_uci(), self.perft(depth - 1)));
            self.undo_move();
        }
        out
    }
}
