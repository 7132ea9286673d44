//! Iterative deepening driver with aspiration windows.

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::board::Move;

use super::constants::{MATE, MATE_FOUND_MARGIN, MAX_DEPTH, PANIC_DROP, PLY};
use super::engine::{Limits, NodeType, SearchAborted, SearchEngine};
use super::observer::SearchInfo;
use super::params::SearchParams;

/// Kept back from every time allocation for move transmission
const MOVE_OVERHEAD: Duration = Duration::from_millis(100);

/// Longest principal variation recovered from the table
const MAX_PV_LENGTH: usize = 256;

/// Poll interval while an infinite or ponder search waits to be released
const PONDER_POLL_MS: u64 = 10;

/// Outcome of `SearchEngine::go`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Expected reply, second move of the principal variation
    pub ponder_move: Option<Move>,
    /// Score of the last completed iteration, side to move's point of view
    pub score: i32,
    /// Last completed iteration, zero for a book move
    pub depth: u32,
}

impl SearchEngine {
    /// Search the current position within `params` and report the best
    /// move to the observer. Clears the stop flag first.
    pub fn go(&mut self, params: &SearchParams) -> SearchResult {
        self.stop.store(false, Ordering::Relaxed);
        self.pondering.store(params.ponder, Ordering::Relaxed);
        self.run(params)
    }

    /// `go` without touching the stop and ponder flags, for callers that
    /// set them up before the search thread starts.
    pub(crate) fn run(&mut self, params: &SearchParams) -> SearchResult {
        let start = Instant::now();
        self.stats.reset();
        self.found_one_move = false;
        self.initial_ply = self.board.ply();

        let allocation = params
            .calculate_move_time(self.board.side_to_move())
            .map(|t| t.saturating_sub(MOVE_OVERHEAD));
        self.limits = Limits {
            start,
            deadline: if params.ponder {
                None
            } else {
                allocation.map(|a| start + a)
            },
            allocation,
            pondering: params.ponder,
            infinite: params.infinite,
            max_depth: params
                .depth
                .map_or(MAX_DEPTH - 1, |d| (d as usize).clamp(1, MAX_DEPTH - 1)),
            nodes: params.nodes,
            manages_time: params.manages_time(),
            panic_extended: false,
        };
        log::debug!(
            "search {} time {:?} depth {} nodes {:?}",
            self.board.to_fen(),
            allocation,
            self.limits.max_depth,
            self.limits.nodes
        );

        if let Some(mv) = self.book_move() {
            log::debug!("book move {mv}");
            self.observer.best_move(mv, None);
            return SearchResult {
                best_move: Some(mv),
                ponder_move: None,
                score: 0,
                depth: 0,
            };
        }

        self.tt.new_generation();
        let key = self.board.tt_key(false);
        let mut score = self.eval(-MATE, MATE, key, None, false);
        let mut best = Move::NONE;
        let mut ponder = Move::NONE;
        let mut completed = 0;
        let mut aborted = false;

        for depth in 1..=self.limits.max_depth {
            let previous = score;
            let iteration_start = Instant::now();
            match self.aspiration(depth, previous) {
                Ok(s) => score = s,
                Err(SearchAborted) => {
                    aborted = true;
                    break;
                }
            }
            completed = depth;

            let pv = self.principal_variation(self.root_best);
            best = pv.first().copied().unwrap_or(Move::NONE);
            ponder = pv.get(1).copied().unwrap_or(Move::NONE);
            if best.is_some() {
                self.found_one_move = true;
            }
            self.report(depth, score, pv);

            if score.abs() > MATE - MATE_FOUND_MARGIN {
                break;
            }
            self.check_panic_time(depth, previous, score);
            if !self.next_iteration_fits(Instant::now(), iteration_start.elapsed()) {
                log::debug!("depth {depth} took {:?}, not starting another", iteration_start.elapsed());
                break;
            }
        }

        if aborted {
            self.board.undo_to(self.initial_ply);
        } else {
            self.wait_for_release();
        }

        self.stats.log();
        log::debug!(
            "finished depth {completed} score {score} in {:?}",
            self.limits.start.elapsed()
        );
        let ponder = ponder.is_some().then_some(ponder);
        self.observer.best_move(best, ponder);
        SearchResult {
            best_move: best.is_some().then_some(best),
            ponder_move: ponder,
            score,
            depth: completed as u32,
        }
    }

    fn book_move(&mut self) -> Option<Move> {
        if !self.config.use_book {
            return None;
        }
        if self.config.book_knowledge < 100
            && self.rng.gen_range(0..100) >= self.config.book_knowledge
        {
            return None;
        }
        self.book.get_move(&self.board, &mut self.rng)
    }

    /// Root search at `depth`, with a window around `previous` that widens
    /// through the configured sizes on each fail low or fail high.
    fn aspiration(&mut self, depth: usize, previous: i32) -> Result<i32, SearchAborted> {
        let mut fail_low = 0;
        let mut fail_high = 0;
        let mut alpha = self.window_bound(previous, fail_low, -1);
        let mut beta = self.window_bound(previous, fail_high, 1);
        loop {
            self.root_best = Move::NONE;
            let score = self.search(
                NodeType::Root,
                depth as i32 * PLY,
                alpha,
                beta,
                false,
                Move::NONE,
            )?;
            if score <= alpha && alpha > -MATE {
                fail_low += 1;
                alpha = self.window_bound(previous, fail_low, -1);
            } else if score >= beta && beta < MATE {
                fail_high += 1;
                beta = self.window_bound(previous, fail_high, 1);
            } else {
                return Ok(score);
            }
        }
    }

    /// Window edge after `fails` failures on the side given by `sign`.
    fn window_bound(&self, center: i32, fails: usize, sign: i32) -> i32 {
        let sizes = &self.config.aspiration_window_sizes;
        match sizes.get(fails) {
            Some(&size) if self.config.aspiration_window => {
                (center + sign * size).clamp(-MATE, MATE)
            }
            _ => sign * MATE,
        }
    }

    /// Root move followed by the moves stored in the table, stopping at a
    /// repeated position or a move that is not playable.
    fn principal_variation(&mut self, root_move: Move) -> Vec<Move> {
        let mut pv = Vec::new();
        let mut seen = HashSet::new();
        let mut mv = if root_move.is_some() {
            root_move
        } else {
            self.tt
                .best_move(self.board.tt_key(false))
                .unwrap_or(Move::NONE)
        };
        while pv.len() < MAX_PV_LENGTH && mv.is_some() && seen.insert(self.board.key()) {
            if !self.board.is_pseudo_legal(mv) || !self.board.do_move(mv) {
                break;
            }
            pv.push(mv);
            mv = self
                .tt
                .best_move(self.board.tt_key(false))
                .unwrap_or(Move::NONE);
        }
        for _ in 0..pv.len() {
            self.board.undo_move();
        }
        pv
    }

    fn report(&mut self, depth: usize, score: i32, pv: Vec<Move>) {
        let time_ms = self.limits.start.elapsed().as_millis() as u64;
        let info = SearchInfo {
            depth: depth as u32,
            score,
            nodes: self.stats.nodes,
            time_ms,
            nps: self.stats.nodes * 1000 / (time_ms + 1),
            hashfull: self.tt.hashfull(),
            pv,
        };
        log::debug!("{info}");
        self.observer.info(&info);
    }

    /// On a clock, a score collapse buys one extra allocation of time.
    fn check_panic_time(&mut self, depth: usize, previous: i32, score: i32) {
        if !self.limits.manages_time || self.limits.panic_extended || depth < 2 {
            return;
        }
        if score >= previous - PANIC_DROP {
            return;
        }
        if let (Some(deadline), Some(allocation)) = (self.limits.deadline, self.limits.allocation) {
            self.limits.deadline = Some(deadline + allocation);
            self.limits.panic_extended = true;
            log::debug!("score fell from {previous} to {score}, thinking {allocation:?} longer");
        }
    }

    /// On a clock, an iteration that is unlikely to finish is not started.
    /// The next one is assumed to take twice as long as the last.
    pub(super) fn next_iteration_fits(&self, now: Instant, last_iteration: Duration) -> bool {
        if !self.limits.manages_time {
            return true;
        }
        self.limits
            .deadline
            .map_or(true, |deadline| now + last_iteration * 2 <= deadline)
    }

    /// An infinite or ponder search must not answer before it is told to.
    fn wait_for_release(&self) {
        while !self.stop.load(Ordering::Relaxed)
            && (self.limits.infinite || self.pondering.load(Ordering::Relaxed))
        {
            thread::sleep(Duration::from_millis(PONDER_POLL_MS));
        }
    }
}
