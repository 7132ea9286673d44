pub mod board;
pub mod book;
pub mod engine;
pub mod eval;
pub mod search;
pub mod tt;
pub mod zobrist;

pub use board::{Board, Color, GameState, Move, Piece, Square};
pub use book::{Book, FixedBook, NoBook};
pub use engine::EngineController;
pub use eval::{Evaluator, SimplifiedEvaluator};
pub use search::{SearchConfig, SearchEngine, SearchParams, SearchResult};
pub use tt::TranspositionTable;
