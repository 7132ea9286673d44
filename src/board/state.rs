use std::sync::Arc;

use super::attack_tables::AttackTables;
use super::{Bitboard, CastlingRights, Color, Move, Piece, Square};
use crate::tt::TtKey;
use crate::zobrist::ZobristKeys;

/// Plies of history preallocated per board; the stack grows past it if needed.
pub const MAX_MOVES: usize = 1024;

/// Everything `undo_move` needs to put the position back exactly.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HistoryEntry {
    pub(crate) pieces: [Bitboard; 6],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) check: bool,
    pub(crate) fifty: u16,
    pub(crate) key: [u64; 2],
    /// Move played from this position (`Move::NONE` for a null move)
    pub(crate) mv: Move,
    pub(crate) captured: Option<Piece>,
}

/// Result of `Board::is_endgame`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    /// Side to move is checkmated
    Checkmate,
    Stalemate,
    /// Fifty-move rule, repetition or insufficient material
    Draw,
}

#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: [Bitboard; 6],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) turn: Color,
    pub(crate) castling: CastlingRights,
    /// Only set when an enemy pawn can actually capture en passant
    pub(crate) en_passant: Option<Square>,
    /// Side to move is in check
    pub(crate) check: bool,
    pub(crate) fifty: u16,
    pub(crate) key: [u64; 2],
    /// Absolute ply of the position the board was set up from (for the FEN move number)
    pub(crate) initial_ply: u32,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) attacks: Arc<AttackTables>,
    pub(crate) zobrist: Arc<ZobristKeys>,
}

impl Board {
    /// Standard starting position using the shared tables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tables(AttackTables::shared(), ZobristKeys::shared())
    }

    /// Standard starting position using caller-supplied tables.
    #[must_use]
    pub fn with_tables(attacks: Arc<AttackTables>, zobrist: Arc<ZobristKeys>) -> Self {
        let mut board = Board::empty(attacks, zobrist);
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            let file = file as u8;
            board.put_piece(Square::new(0, file), Color::White, *piece);
            board.put_piece(Square::new(7, file), Color::Black, *piece);
            board.put_piece(Square::new(1, file), Color::White, Piece::Pawn);
            board.put_piece(Square::new(6, file), Color::Black, Piece::Pawn);
        }
        board.castling = CastlingRights::all();
        board.key = board.zobrist.fully_recompute(&board);
        board
    }

    pub(crate) fn empty(attacks: Arc<AttackTables>, zobrist: Arc<ZobristKeys>) -> Self {
        Board {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            turn: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            check: false,
            fifty: 0,
            key: [0; 2],
            initial_ply: 0,
            history: Vec::with_capacity(MAX_MOVES),
            attacks,
            zobrist,
        }
    }

    pub(crate) fn put_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[piece.index()] |= bit;
        self.colors[color.index()] |= bit;
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant
    }

    /// Two-word Zobrist key (white features, black features)
    #[inline]
    #[must_use]
    pub fn key(&self) -> [u64; 2] {
        self.key
    }

    /// Recompute the key from scratch; matches `key()` unless the incremental update drifted.
    #[must_use]
    pub fn recompute_key(&self) -> [u64; 2] {
        self.zobrist.fully_recompute(self)
    }

    #[inline]
    #[must_use]
    pub fn fifty_move_counter(&self) -> u16 {
        self.fifty
    }

    /// Plies played since the position was set up
    #[inline]
    #[must_use]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Full-move number as written in FEN
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        (self.initial_ply + self.history.len() as u32) / 2 + 1
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.check
    }

    #[inline]
    #[must_use]
    pub fn attack_tables(&self) -> &AttackTables {
        &self.attacks
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    #[must_use]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Pieces of `piece` type, both colors
    #[inline]
    #[must_use]
    pub fn piece_bb(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Pieces belonging to the side to move
    #[inline]
    #[must_use]
    pub fn mine(&self) -> Bitboard {
        self.colors[self.turn.index()]
    }

    #[inline]
    #[must_use]
    pub fn others(&self) -> Bitboard {
        self.colors[self.turn.opponent().index()]
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let bit = Bitboard::from_square(sq);
        let color = if (self.colors[0] & bit).is_not_empty() {
            Color::White
        } else if (self.colors[1] & bit).is_not_empty() {
            Color::Black
        } else {
            return None;
        };
        Piece::ALL
            .into_iter()
            .find(|p| (self.pieces[p.index()] & bit).is_not_empty())
            .map(|p| (color, p))
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color, Piece::King).lsb()
    }

    /// True if any piece of `by` attacks `sq`
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let t = &self.attacks;
        let occ = self.occupied();
        let them = self.colors[by.index()];
        let diagonal = self.pieces[Piece::Bishop.index()] | self.pieces[Piece::Queen.index()];
        let straight = self.pieces[Piece::Rook.index()] | self.pieces[Piece::Queen.index()];
        ((t.pawn(by.opponent(), sq) & self.pieces[Piece::Pawn.index()])
            | (t.knight(sq) & self.pieces[Piece::Knight.index()])
            | (t.king(sq) & self.pieces[Piece::King.index()])
            | (t.bishop(sq, occ) & diagonal)
            | (t.rook(sq, occ) & straight))
            & them
            != Bitboard::EMPTY
    }

    /// Attackers of either color on `sq`, sliders resolved through `occupied`
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let t = &self.attacks;
        let pawns = self.pieces[Piece::Pawn.index()];
        let diagonal = self.pieces[Piece::Bishop.index()] | self.pieces[Piece::Queen.index()];
        let straight = self.pieces[Piece::Rook.index()] | self.pieces[Piece::Queen.index()];
        (t.pawn(Color::Black, sq) & pawns & self.colors[0])
            | (t.pawn(Color::White, sq) & pawns & self.colors[1])
            | (t.knight(sq) & self.pieces[Piece::Knight.index()])
            | (t.king(sq) & self.pieces[Piece::King.index()])
            | t.xray_attacks(sq, occupied, diagonal, straight)
    }

    pub(crate) fn king_attacked(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => self.is_square_attacked(sq, color.opponent()),
            None => false,
        }
    }

    /// Transposition table key for this position.
    ///
    /// With `exclusion` set the index moves to a different slot range so a
    /// search that skips the hash move does not overwrite the full result.
    #[inline]
    #[must_use]
    pub fn tt_key(&self, exclusion: bool) -> TtKey {
        let mut index = self.key[0] ^ self.key[1];
        if exclusion {
            index ^= self.zobrist.exclusion();
        }
        TtKey {
            index,
            verifier: self.key[0] ^ !self.key[1],
        }
    }

    /// Fifty-move rule, threefold repetition or insufficient material.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        if self.fifty >= 100 {
            return true;
        }
        // Nothing before the last capture or pawn move can repeat
        let ply = self.history.len();
        let start = ply.saturating_sub(self.fifty as usize);
        let repetitions = self.history[start..ply.saturating_sub(1).max(start)]
            .iter()
            .filter(|h| h.key == self.key)
            .count();
        if repetitions >= 2 {
            return true;
        }
        self.is_insufficient_material()
    }

    fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces[Piece::Pawn.index()]
            | self.pieces[Piece::Rook.index()]
            | self.pieces[Piece::Queen.index()];
        if heavy.is_not_empty() {
            return false;
        }
        let knights = self.pieces[Piece::Knight.index()];
        let bishops = self.pieces[Piece::Bishop.index()];
        let minors = knights | bishops;
        match minors.popcount() {
            0 | 1 => true,
            // K+N+N vs bare K cannot force mate
            2 => {
                bishops.is_empty()
                    && ((knights & self.colors[0]) == knights
                        || (knights & self.colors[1]) == knights)
            }
            _ => false,
        }
    }

    /// Mate, stalemate, draw or still playing, from the side to move's view.
    pub fn is_endgame(&mut self) -> GameState {
        if !self.has_legal_move() {
            if self.check {
                GameState::Checkmate
            } else {
                GameState::Stalemate
            }
        } else if self.is_draw() {
            GameState::Draw
        } else {
            GameState::Ongoing
        }
    }

    /// Pawn on `sq` with no enemy pawn ahead of it on its own or adjacent files
    #[must_use]
    pub fn is_passed_pawn(&self, sq: Square) -> bool {
        let Some((color, Piece::Pawn)) = self.piece_at(sq) else {
            return false;
        };
        let file = sq.file();
        let mut files = Bitboard::file_mask(file);
        if file > 0 {
            files |= Bitboard::file_mask(file - 1);
        }
        if file < 7 {
            files |= Bitboard::file_mask(file + 1);
        }
        let ahead = match color {
            Color::White => Bitboard(!0u64 << 8 << (sq.rank() * 8)),
            Color::Black => Bitboard((1u64 << (sq.rank() * 8)) - 1),
        };
        (files & ahead & self.pieces_of(color.opponent(), Piece::Pawn)).is_empty()
    }

    /// Move that led to this position, `Move::NONE` at the root or after a null move
    #[must_use]
    pub fn last_move(&self) -> Move {
        self.history.last().map_or(Move::NONE, |h| h.mv)
    }

    #[must_use]
    pub fn last_captured_piece(&self) -> Option<Piece> {
        self.history.last().and_then(|h| h.captured)
    }

    /// The last two moves captured on the same square, taking equal material
    /// (knights and bishops count as equal).
    #[must_use]
    pub fn last_move_is_recapture(&self) -> bool {
        let n = self.history.len();
        if n < 2 {
            return false;
        }
        let (prev, last) = (&self.history[n - 2], &self.history[n - 1]);
        if prev.mv.is_none() || last.mv.is_none() || prev.mv.to() != last.mv.to() {
            return false;
        }
        let minor_as_bishop = |p: Piece| if p == Piece::Knight { Piece::Bishop } else { p };
        match (prev.captured, last.captured) {
            (Some(a), Some(b)) => minor_as_bishop(a) == minor_as_bishop(b),
            _ => false,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

/// Positions compare by what is on the board, not by how they were reached.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.colors == other.colors
            && self.turn == other.turn
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.fifty == other.fifty
            && self.key == other.key
    }
}
