//! Alpha-beta search over fractional depths.
//!
//! `SearchEngine` owns the board, the transposition table and the move
//! ordering state of one search. The recursion returns
//! `Result<i32, SearchAborted>`: every frame takes back the move it played
//! before handing an abort to its caller, so the board is never left in the
//! middle of a line.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Bitboard, Board, Color, FenError, Move, Piece};
use crate::book::{Book, NoBook};
use crate::eval::{Evaluator, SimplifiedEvaluator};
use crate::tt::{BoundType, TranspositionTable, TtEntry, TtKey};

use super::config::SearchConfig;
use super::constants::{
    value_is_mate, value_mate_in, value_mated_in, IID_DEPTH, LMR_DEPTHS_NOT_REDUCED, MATE,
    MAX_DEPTH, PAWN_VALUE, PIECE_VALUES, PLY, RAZOR_DEPTH, SINGULAR_MOVE_DEPTH,
};
use super::move_order::MoveIterator;
use super::observer::{LogObserver, SearchObserver, SearchStats};
use super::sort_info::SortInfo;

/// The clock is read once every this many nodes
const NODES_PER_CLOCK_CHECK: u64 = 1024;

/// Scores within this distance of a mate are treated as mates by the
/// pruning rules
const MATE_MARGIN: i32 = 100;

/// A recapture is extended when it gets back at least the captured value
/// minus this
const RECAPTURE_SEE_MARGIN: i32 = 50;

/// The search ran out of time, was stopped or hit its node limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchAborted;

impl fmt::Display for SearchAborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Search aborted")
    }
}

impl std::error::Error for SearchAborted {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum NodeType {
    Root,
    Pv,
    /// Zero window
    Null,
}

impl NodeType {
    fn index(self) -> usize {
        match self {
            NodeType::Root => 0,
            NodeType::Pv => 1,
            NodeType::Null => 2,
        }
    }

    fn is_pv(self) -> bool {
        self != NodeType::Null
    }
}

/// Late move reductions by `[depth in plies][moves already searched]`.
struct LmrTables {
    pv: Box<[[i32; 64]; 64]>,
    non_pv: Box<[[i32; 64]; 64]>,
}

impl LmrTables {
    fn new() -> Self {
        let mut pv = Box::new([[0; 64]; 64]);
        let mut non_pv = Box::new([[0; 64]; 64]);
        let to_units = |r: f64| if r >= 1.0 { (r * f64::from(PLY)).floor() as i32 } else { 0 };
        for depth in 1..64 {
            for moves in 1..64 {
                let base = (depth as f64).ln() * (moves as f64).ln();
                pv[depth][moves] = to_units(0.5 + base / 6.0);
                non_pv[depth][moves] = to_units(0.5 + base / 3.0);
            }
        }
        LmrTables { pv, non_pv }
    }

    fn reduction(&self, node: NodeType, depth: i32, moves_done: usize) -> i32 {
        let d = ((depth / PLY) as usize).min(63);
        let m = moves_done.min(63);
        if node.is_pv() {
            self.pv[d][m]
        } else {
            self.non_pv[d][m]
        }
    }
}

/// Limits of the search in progress.
#[derive(Clone, Copy, Debug)]
pub(super) struct Limits {
    pub(super) start: Instant,
    /// Wall-clock stop, `None` while unbounded or pondering
    pub(super) deadline: Option<Instant>,
    /// Thinking time granted, applied from `ponderhit` when pondering
    pub(super) allocation: Option<Duration>,
    pub(super) pondering: bool,
    pub(super) infinite: bool,
    pub(super) max_depth: usize,
    pub(super) nodes: Option<u64>,
    pub(super) manages_time: bool,
    pub(super) panic_extended: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            start: Instant::now(),
            deadline: None,
            allocation: None,
            pondering: false,
            infinite: false,
            max_depth: MAX_DEPTH,
            nodes: None,
            manages_time: false,
            panic_extended: false,
        }
    }
}

/// Single-threaded iterative deepening searcher.
///
/// # Example
/// ```
/// use carbon_chess::search::{SearchConfig, SearchEngine, SearchParams};
///
/// let mut engine = SearchEngine::new(SearchConfig::default());
/// engine.set_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
/// let result = engine.go(&SearchParams::depth(3));
/// assert_eq!(result.best_move.unwrap().to_uci(), "a1a8");
/// ```
pub struct SearchEngine {
    pub(super) board: Board,
    pub(super) tt: TranspositionTable,
    pub(super) sort_info: SortInfo,
    pub(super) iterators: Vec<MoveIterator>,
    pub(super) config: SearchConfig,
    pub(super) evaluator: Box<dyn Evaluator + Send>,
    pub(super) book: Box<dyn Book + Send>,
    pub(super) observer: Box<dyn SearchObserver>,
    lmr: LmrTables,
    pub(super) stop: Arc<AtomicBool>,
    pub(super) pondering: Arc<AtomicBool>,
    pub(super) rng: StdRng,
    pub(super) stats: SearchStats,
    pub(super) limits: Limits,
    /// Board ply of the root position
    pub(super) initial_ply: usize,
    /// Set once an iteration has produced a root move; until then nothing
    /// aborts the search
    pub(super) found_one_move: bool,
    /// Best move of the root search in progress
    pub(super) root_best: Move,
}

impl SearchEngine {
    /// Engine on the starting position, with the simplified evaluator, no
    /// book and progress sent to the log.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        let tt = TranspositionTable::new(config.transposition_table_size);
        SearchEngine {
            board: Board::new(),
            tt,
            sort_info: SortInfo::new(),
            iterators: (0..MAX_DEPTH).map(MoveIterator::new).collect(),
            config,
            evaluator: Box::new(SimplifiedEvaluator::new()),
            book: Box::new(NoBook),
            observer: Box::new(LogObserver),
            lmr: LmrTables::new(),
            stop: Arc::new(AtomicBool::new(false)),
            pondering: Arc::new(AtomicBool::new(false)),
            rng: StdRng::from_entropy(),
            stats: SearchStats::default(),
            limits: Limits::default(),
            initial_ply: 0,
            found_one_move: false,
            root_best: Move::NONE,
        }
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluator + Send>) {
        self.evaluator = evaluator;
        // Cached evaluations belong to the old evaluator
        self.tt.clear();
    }

    pub fn set_book(&mut self, book: Box<dyn Book + Send>) {
        self.book = book;
    }

    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.observer = observer;
    }

    /// Replace the configuration. The table is reallocated only when its
    /// size changes.
    pub fn set_config(&mut self, config: SearchConfig) {
        if config.transposition_table_size != self.config.transposition_table_size {
            self.tt = TranspositionTable::new(config.transposition_table_size);
        }
        self.config = config;
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Reseed the generator behind book choices and root randomisation.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        self.board.set_fen(fen)
    }

    /// Forget everything learned in the previous game.
    pub fn new_game(&mut self) {
        self.board = Board::new();
        self.tt.clear();
        self.sort_info.clear();
    }

    #[must_use]
    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Counters of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Flag that stops the search once a move has been found.
    #[must_use]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Flag that is set while pondering; clearing it is a ponderhit.
    #[must_use]
    pub fn ponder_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.pondering)
    }

    #[inline]
    pub(super) fn ply(&self) -> usize {
        self.board.ply() - self.initial_ply
    }

    /// Err once time, nodes or the stop flag say so and a root move exists.
    pub(super) fn check_abort(&mut self) -> Result<(), SearchAborted> {
        let check_clock = self.stats.nodes % NODES_PER_CLOCK_CHECK == 0;
        if check_clock && self.limits.pondering && !self.pondering.load(Ordering::Relaxed) {
            self.limits.pondering = false;
            let now = Instant::now();
            self.limits.deadline = self.limits.allocation.map(|a| now + a);
            log::debug!("ponderhit, deadline in {:?}", self.limits.allocation);
        }
        if !self.found_one_move {
            return Ok(());
        }
        if self.stop.load(Ordering::Relaxed) {
            return Err(SearchAborted);
        }
        if self.limits.nodes.is_some_and(|limit| self.stats.nodes >= limit) {
            return Err(SearchAborted);
        }
        if check_clock
            && self
                .limits
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
        {
            return Err(SearchAborted);
        }
        Ok(())
    }

    /// Draw score seen from the side to move; contempt makes the engine
    /// avoid draws at its own turns.
    pub(super) fn evaluate_draw(&self) -> i32 {
        if self.ply() % 2 == 0 {
            -self.config.contempt_factor
        } else {
            self.config.contempt_factor
        }
    }

    /// Score of a node without legal moves.
    pub(super) fn evaluate_endgame(&self) -> i32 {
        if self.board.in_check() {
            value_mated_in(self.ply())
        } else {
            self.evaluate_draw()
        }
    }

    pub(super) fn can_use_tt(&self, entry: &TtEntry, depth: i32, alpha: i32, beta: i32) -> bool {
        if i32::from(entry.depth) < depth || !self.tt.is_current(entry) {
            return false;
        }
        match entry.bound {
            BoundType::Exact => true,
            BoundType::FailLow => entry.score <= alpha,
            BoundType::FailHigh => entry.score >= beta,
            BoundType::Eval => false,
        }
    }

    /// Static evaluation from the side to move's point of view.
    ///
    /// A cached evaluation is reused; a fresh one is cached. With `refine`
    /// a bound stored for this position tightens the result.
    pub(super) fn eval(
        &mut self,
        alpha: i32,
        beta: i32,
        key: TtKey,
        entry: Option<&TtEntry>,
        refine: bool,
    ) -> i32 {
        let white = self.board.side_to_move() == Color::White;
        let white_eval = match entry.and_then(|e| e.eval) {
            Some(cached) => cached,
            None => {
                let (a, b) = if white { (alpha, beta) } else { (-beta, -alpha) };
                let e = self.evaluator.evaluate(&self.board, a, b);
                self.tt.set_eval(key, e);
                e
            }
        };
        let mut score = if white { white_eval } else { -white_eval };
        if refine {
            if let Some(e) = entry.filter(|e| !value_is_mate(e.score)) {
                match e.bound {
                    BoundType::FailHigh if e.score > score => score = e.score,
                    BoundType::FailLow if e.score < score => score = e.score,
                    _ => {}
                }
            }
        }
        score
    }

    /// Null move is pointless in check and risky with only king and pawns.
    fn board_allows_null_move(&self) -> bool {
        let pieces = self.board.piece_bb(Piece::Knight)
            | self.board.piece_bb(Piece::Bishop)
            | self.board.piece_bb(Piece::Rook)
            | self.board.piece_bb(Piece::Queen);
        !self.board.in_check() && (pieces & self.board.mine()).is_not_empty()
    }

    fn pawns_on_seventh(&self) -> bool {
        let white = self.board.pieces_of(Color::White, Piece::Pawn) & Bitboard::RANK_7;
        let black = self.board.pieces_of(Color::Black, Piece::Pawn) & Bitboard::RANK_2;
        (white | black).is_not_empty()
    }

    /// Exchange value of `mv` when it recaptures on the square the last
    /// move captured on. Taken before the move is played.
    fn recapture_see(&self, mv: Move) -> Option<i32> {
        let last = self.board.last_move();
        let recapture = self.config.extensions_recapture > 0
            && mv.is_capture()
            && last.is_some()
            && last.is_capture()
            && last.to() == mv.to();
        recapture.then(|| self.board.see(mv))
    }

    /// Extension for `mv`, which has just been played.
    fn extensions(&self, mv: Move, node: NodeType, mate_threat: bool, see: Option<i32>) -> i32 {
        let mut ext = 0;
        if self.board.in_check() {
            ext += if node.is_pv() {
                self.config.extensions_check
            } else {
                self.config.extensions_check >> 1
            };
        }
        if mv.piece() == Piece::Pawn {
            if mv.is_pawn_push_678() {
                ext += self.config.extensions_pawn_push;
            }
            if self.board.is_passed_pawn(mv.to()) {
                ext += self.config.extensions_passed_pawn;
            }
        }
        if mate_threat {
            ext += self.config.extensions_mate_threat;
        }
        if ext < self.config.extensions_recapture && self.board.last_move_is_recapture() {
            let captured = self
                .board
                .last_captured_piece()
                .map_or(0, |p| PIECE_VALUES[p.index()]);
            if see.is_some_and(|s| s > captured - RECAPTURE_SEE_MARGIN) {
                ext = self.config.extensions_recapture;
            }
        }
        ext.min(PLY)
    }

    /// Main search. `depth` is in `PLY` units; `excluded` is skipped and
    /// switches the table to the exclusion key.
    pub(super) fn search(
        &mut self,
        node: NodeType,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
        allow_null: bool,
        excluded: Move,
    ) -> Result<i32, SearchAborted> {
        self.check_abort()?;
        self.stats.nodes += 1;

        let ply = self.ply();
        // The root always searches its moves so there is one to play
        if node != NodeType::Root {
            if self.board.is_draw() {
                return Ok(self.evaluate_draw());
            }
            // Mate distance pruning
            alpha = alpha.max(value_mated_in(ply));
            beta = beta.min(value_mate_in(ply + 1));
            if alpha >= beta {
                return Ok(alpha);
            }
        }

        let key = self.board.tt_key(excluded.is_some());
        self.stats.tt_probes += 1;
        let mut entry = self.tt.probe(key, ply);
        let mut tt_move = Move::NONE;
        let mut tt_score = 0;
        if let Some(e) = entry {
            self.stats.tt_hits += 1;
            if node != NodeType::Root && self.can_use_tt(&e, depth, alpha, beta) {
                self.stats.tt_cutoffs += 1;
                return Ok(e.score);
            }
            tt_move = e.best_move;
            tt_score = e.score;
        }

        if depth < PLY || ply >= MAX_DEPTH {
            return self.quiescence(0, alpha, beta);
        }

        let in_check = self.board.in_check();
        let eval = if in_check {
            -MATE
        } else {
            self.eval(beta - 1, beta, key, entry.as_ref(), true)
        };

        // Razoring
        if node == NodeType::Null
            && self.config.razoring
            && !in_check
            && tt_move.is_none()
            && allow_null
            && depth < RAZOR_DEPTH
            && !value_is_mate(beta)
            && eval < beta - self.config.razoring_margin
            && !self.pawns_on_seventh()
        {
            let rbeta = beta - self.config.razoring_margin;
            let v = self.quiescence(0, rbeta - 1, rbeta)?;
            if v < rbeta {
                self.stats.razoring += 1;
                return Ok(v);
            }
        }

        // Static null move
        if node == NodeType::Null
            && self.config.static_null_move
            && allow_null
            && self.board_allows_null_move()
            && depth < RAZOR_DEPTH
            && !value_is_mate(beta)
            && eval >= beta + self.config.futility_margin
        {
            self.stats.static_null += 1;
            return Ok(eval - self.config.futility_margin);
        }

        let mut mate_threat = false;
        let null_margin = if depth >= 4 * PLY {
            self.config.null_move_margin
        } else {
            0
        };
        if node == NodeType::Null
            && self.config.null_move
            && allow_null
            && self.board_allows_null_move()
            && depth > 3 * PLY
            && !value_is_mate(beta)
            && eval > beta - null_margin
        {
            let mut r = 3 * PLY + if depth >= 5 * PLY { depth / (4 * PLY) } else { 0 };
            if eval - beta > PAWN_VALUE {
                r += 1;
            }
            self.board.do_null_move();
            let result = self.search(NodeType::Null, depth - r, -beta, -beta + 1, false, Move::NONE);
            self.board.undo_move();
            let mut score = -result?;
            if score >= beta {
                if value_is_mate(score) {
                    score = beta;
                }
                if depth < 6 * PLY
                    || self.search(NodeType::Null, depth - 5 * PLY, beta - 1, beta, false, Move::NONE)?
                        >= beta
                {
                    self.stats.null_move += 1;
                    if depth >= 6 * PLY {
                        self.stats.null_move_verified += 1;
                    }
                    return Ok(score);
                }
            } else if score < -MATE + MATE_MARGIN {
                mate_threat = true;
            }
        }

        // Internal iterative deepening
        if self.config.iid
            && tt_move.is_none()
            && depth >= IID_DEPTH[node.index()]
            && allow_null
            && !in_check
            && (node != NodeType::Null || eval > beta - self.config.iid_margin)
            && excluded.is_none()
        {
            self.stats.iid += 1;
            let d = if node == NodeType::Pv {
                depth - 2 * PLY
            } else {
                depth >> 1
            };
            self.search(node, d, alpha, beta, true, Move::NONE)?;
            entry = self.tt.probe(key, ply);
            if let Some(e) = entry {
                tt_move = e.best_move;
                tt_score = e.score;
            }
        }

        let singular = node != NodeType::Root
            && tt_move.is_some()
            && self.config.extensions_singular > 0
            && depth >= SINGULAR_MOVE_DEPTH[node.index()]
            && entry.is_some_and(|e| {
                e.bound == BoundType::FailHigh
                    && i32::from(e.depth) >= depth - 3 * PLY
                    && tt_score.abs() < MATE - MATE_MARGIN
            });

        let futility_prune = node == NodeType::Null
            && !in_check
            && if depth <= PLY {
                self.config.futility && eval < beta - self.config.futility_margin
            } else if depth <= 2 * PLY {
                self.config.aggressive_futility
                    && eval < beta - self.config.aggressive_futility_margin
            } else {
                false
            };

        let mut best_move = Move::NONE;
        let mut best_score = -MATE;
        let mut moves_done = 0;
        let mut valid = false;

        self.iterators[ply].reset(&self.board, &self.sort_info, tt_move);
        while let Some(mv) = self.iterators[ply].next(&self.board, &self.sort_info) {
            let see = self.recapture_see(mv);
            if !self.board.do_move(mv) {
                continue;
            }
            valid = true;
            if mv == excluded {
                self.board.undo_move();
                continue;
            }

            let mut ext = self.extensions(mv, node, mate_threat, see);

            if singular && mv == tt_move && ext < PLY && excluded.is_none() {
                self.board.undo_move();
                let se_beta = tt_score - self.config.singular_extension_margin;
                // The probe searches this same node, so it needs its own iterator
                let parent = mem::replace(&mut self.iterators[ply], MoveIterator::new(ply));
                let result = self.search(node, depth >> 1, se_beta - 1, se_beta, false, mv);
                self.iterators[ply] = parent;
                let exc_score = result?;
                self.board.do_move(mv);
                if exc_score < se_beta {
                    self.stats.singular += 1;
                    ext = (ext + self.config.extensions_singular).min(PLY);
                }
            }

            let important = node == NodeType::Root
                || ext != 0
                || mv.is_capture()
                || mv.is_promotion()
                || mv.is_castling()
                || in_check
                || mv == tt_move
                || self.sort_info.is_killer(mv, ply);

            if futility_prune && best_score > -MATE + MATE_MARGIN && !important {
                self.stats.futility += 1;
                self.board.undo_move();
                continue;
            }

            let reduction = if self.config.lmr && depth >= LMR_DEPTHS_NOT_REDUCED && !important {
                self.lmr.reduction(node, depth, moves_done)
            } else {
                0
            };
            moves_done += 1;

            let low = alpha.max(best_score);
            let result = self.search_move(node, depth + ext, reduction, low, beta, moves_done == 1);
            self.board.undo_move();
            let score = result?;

            // The first root move is always kept so there is something to play
            let randomised =
                node == NodeType::Root && self.config.rand > 0 && best_move.is_some();
            if score > best_score && (!randomised || self.rng_percent() > self.config.rand) {
                best_move = mv;
                best_score = score;
                if node == NodeType::Root {
                    self.root_best = mv;
                }
            }
            if score >= beta {
                break;
            }
        }

        if excluded.is_none() && !valid {
            best_score = self.evaluate_endgame();
        }

        if best_score >= beta {
            self.stats.beta_cutoffs += 1;
            if excluded.is_none() {
                self.sort_info.beta_cutoff(best_move, ply);
            }
        }

        self.tt.save(key, depth, best_move, best_score, alpha, beta, ply);
        Ok(best_score)
    }

    /// Search the move just played: full window for the first move of a PV
    /// node, otherwise a zero window (reduced first when `reduction` is set)
    /// re-searched as PV when it lands inside the window.
    fn search_move(
        &mut self,
        node: NodeType,
        depth: i32,
        reduction: i32,
        low: i32,
        beta: i32,
        first: bool,
    ) -> Result<i32, SearchAborted> {
        if node.is_pv() && first {
            return Ok(-self.search(NodeType::Pv, depth - PLY, -beta, -low, true, Move::NONE)?);
        }
        if reduction > 0 {
            self.stats.lmr += 1;
            let score = -self.search(
                NodeType::Null,
                depth - reduction - PLY,
                -low - 1,
                -low,
                true,
                Move::NONE,
            )?;
            if score <= low {
                return Ok(score);
            }
            self.stats.lmr_researched += 1;
        }
        let mut score = -self.search(NodeType::Null, depth - PLY, -low - 1, -low, true, Move::NONE)?;
        if node.is_pv() && score > low && (node == NodeType::Root || score < beta) {
            self.stats.pv_researched += 1;
            score = -self.search(NodeType::Pv, depth - PLY, -beta, -low, true, Move::NONE)?;
        }
        Ok(score)
    }

    fn rng_percent(&mut self) -> u32 {
        self.rng.gen_range(0..100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(fen: &str) -> SearchEngine {
        let mut engine = SearchEngine::new(SearchConfig {
            transposition_table_size: 1,
            ..SearchConfig::default()
        });
        engine.set_fen(fen).unwrap();
        engine
    }

    #[test]
    fn reduction_tables_grow_with_depth_and_move_count() {
        let lmr = LmrTables::new();
        assert_eq!(lmr.reduction(NodeType::Null, PLY, 1), 0);
        let shallow = lmr.reduction(NodeType::Null, 4 * PLY, 4);
        let deep = lmr.reduction(NodeType::Null, 20 * PLY, 30);
        assert!(deep > shallow);
        assert!(lmr.reduction(NodeType::Pv, 20 * PLY, 30) < deep);
        assert_eq!(lmr.reduction(NodeType::Root, 200 * PLY, 500), lmr.pv[63][63]);
    }

    #[test]
    fn draw_score_alternates_with_contempt() {
        let mut e = engine("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(e.evaluate_draw(), -90);
        let mv = e.board.legal_moves()[0];
        e.board.do_move(mv);
        assert_eq!(e.evaluate_draw(), 90);
    }

    #[test]
    fn endgame_score_is_mate_or_draw() {
        // Fool's mate, white to move is mated
        let e = engine("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(e.evaluate_endgame(), -MATE);
        let e = engine("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(e.evaluate_endgame(), -90);
    }

    #[test]
    fn null_move_needs_a_piece() {
        assert!(!engine("4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 1").board_allows_null_move());
        assert!(engine("4k3/pppp4/8/8/8/8/PPPP4/1N2K3 w - - 0 1").board_allows_null_move());
    }

    #[test]
    fn cached_eval_is_reused_and_flipped_for_black() {
        let mut e = engine("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
        let key = e.board.tt_key(false);
        let first = e.eval(-MATE, MATE, key, None, false);
        assert!(first < -800);
        let entry = e.tt.probe(key, 0).unwrap();
        assert_eq!(entry.eval, Some(-first));
        e.set_evaluator(Box::new(|_: &Board| 0));
        e.tt.set_eval(key, -first);
        let entry = e.tt.probe(key, 0).unwrap();
        assert_eq!(e.eval(-MATE, MATE, key, Some(&entry), false), first);
    }

    #[test]
    fn recapture_extension_uses_exchange_value() {
        let mut e = engine("4k3/8/8/3p4/4P3/2N5/8/4K3 b - - 0 1");
        let take = e.board.parse_uci("d5e4").unwrap();
        assert_eq!(e.recapture_see(take), None);
        e.board.do_move(take);
        let retake = e.board.parse_uci("c3e4").unwrap();
        let see = e.recapture_see(retake);
        assert_eq!(see, Some(100));
        e.board.do_move(retake);
        assert_eq!(e.extensions(retake, NodeType::Null, false, see), PLY);
    }

    #[test]
    fn check_extension_is_halved_off_the_principal_variation() {
        let mut e = engine("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let check = e.board.parse_uci("a1a8").unwrap();
        e.board.do_move(check);
        assert_eq!(e.extensions(check, NodeType::Pv, false, None), 2);
        assert_eq!(e.extensions(check, NodeType::Null, false, None), 1);
    }
}
