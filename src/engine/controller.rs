//! Engine controller implementation.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::board::{Board, FenError, MoveParseError};
use crate::book::Book;
use crate::eval::Evaluator;
use crate::search::{SearchConfig, SearchEngine, SearchObserver, SearchParams, SearchResult};

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Active search job state
pub struct SearchJob {
    /// Stop flag shared with the engine
    stop: Arc<AtomicBool>,
    /// Set while pondering; cleared by `ponderhit`
    pondering: Arc<AtomicBool>,
    handle: JoinHandle<SearchResult>,
}

impl SearchJob {
    /// Stop the search and wait for the thread to finish
    pub fn stop_and_wait(self) -> Option<SearchResult> {
        self.signal_stop();
        self.wait()
    }

    /// Wait for the search to end on its own
    pub fn wait(self) -> Option<SearchResult> {
        match self.handle.join() {
            Ok(result) => Some(result),
            Err(_) => {
                log::error!("search thread panicked");
                None
            }
        }
    }

    /// Signal stop without waiting
    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
        self.pondering.store(false, Ordering::Relaxed);
    }

    /// Handle ponderhit - the clock starts on the next time check
    pub fn ponderhit(&self) {
        self.pondering.store(false, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Runs a `SearchEngine` on a background thread.
///
/// The engine is shared behind a mutex that the search thread holds for
/// the whole search; every method that touches the engine stops the
/// running search first.
pub struct EngineController {
    engine: Arc<Mutex<SearchEngine>>,
    stop: Arc<AtomicBool>,
    pondering: Arc<AtomicBool>,
    current_job: Option<SearchJob>,
}

impl EngineController {
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        Self::with_engine(SearchEngine::new(config))
    }

    /// Wrap an already configured engine.
    #[must_use]
    pub fn with_engine(engine: SearchEngine) -> Self {
        let stop = engine.stop_flag();
        let pondering = engine.ponder_flag();
        EngineController {
            engine: Arc::new(Mutex::new(engine)),
            stop,
            pondering,
            current_job: None,
        }
    }

    /// Copy of the current position.
    #[must_use]
    pub fn board(&mut self) -> Board {
        self.stop_search();
        self.engine.lock().board().clone()
    }

    pub fn set_position(&mut self, fen: &str) -> Result<(), FenError> {
        self.stop_search();
        self.engine.lock().set_fen(fen)
    }

    /// Play moves in UCI notation from the current position. On error the
    /// moves before the bad one stay played.
    pub fn play_moves(&mut self, moves: &[&str]) -> Result<(), MoveParseError> {
        self.stop_search();
        let mut engine = self.engine.lock();
        for uci in moves {
            engine.board_mut().play_uci(uci)?;
        }
        Ok(())
    }

    /// Reset the board to starting position
    pub fn new_game(&mut self) {
        self.stop_search();
        self.engine.lock().new_game();
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.stop_search();
        self.engine.lock().set_config(config);
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluator + Send>) {
        self.stop_search();
        self.engine.lock().set_evaluator(evaluator);
    }

    pub fn set_book(&mut self, book: Box<dyn Book + Send>) {
        self.stop_search();
        self.engine.lock().set_book(book);
    }

    pub fn set_observer(&mut self, observer: Box<dyn SearchObserver>) {
        self.stop_search();
        self.engine.lock().set_observer(observer);
    }

    /// Execute a closure with mutable access to the idle engine.
    pub fn with_engine_mut<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut SearchEngine) -> R,
    {
        self.stop_search();
        f(&mut self.engine.lock())
    }

    /// Start a search with the given parameters
    ///
    /// The `on_complete` callback is called on the search thread with the
    /// result, before it is handed to `wait` or `stop_search`.
    pub fn start_search<F>(&mut self, params: SearchParams, on_complete: F) -> io::Result<()>
    where
        F: FnOnce(&SearchResult) + Send + 'static,
    {
        self.stop_search();

        // Flags are set here so a stop sent right after this call is not
        // lost to a search thread that has not started yet
        self.stop.store(false, Ordering::Relaxed);
        self.pondering.store(params.ponder, Ordering::Relaxed);

        let engine = Arc::clone(&self.engine);
        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = engine.lock().run(&params);
                on_complete(&result);
                result
            })?;

        self.current_job = Some(SearchJob {
            stop: Arc::clone(&self.stop),
            pondering: Arc::clone(&self.pondering),
            handle,
        });
        Ok(())
    }

    /// Stop any active search and return its result
    pub fn stop_search(&mut self) -> Option<SearchResult> {
        self.current_job.take().and_then(SearchJob::stop_and_wait)
    }

    /// Wait for the active search to finish without stopping it. Blocks
    /// forever on an infinite or pondering search that nobody stops.
    pub fn wait(&mut self) -> Option<SearchResult> {
        self.current_job.take().and_then(SearchJob::wait)
    }

    /// Signal stop to active search (non-blocking)
    pub fn signal_stop(&self) {
        if let Some(job) = &self.current_job {
            job.signal_stop();
        }
    }

    /// Handle ponderhit
    pub fn ponderhit(&self) {
        if let Some(job) = &self.current_job {
            job.ponderhit();
        }
    }

    /// Check if there's an unfinished search
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.as_ref().is_some_and(|job| !job.is_finished())
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.stop_search();
    }
}
