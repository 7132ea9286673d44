//! Iterative deepening alpha-beta search.
//!
//! Depths are fractional: one ply is `constants::PLY` units, so extensions
//! and reductions can be smaller than a full ply.

pub mod config;
pub mod constants;
mod engine;
mod move_order;
mod observer;
mod params;
mod quiescence;
mod root;
mod sort_info;

pub use config::SearchConfig;
pub use engine::{SearchAborted, SearchEngine};
pub use move_order::{MoveIterator, Phase};
pub use observer::{LogObserver, SearchInfo, SearchObserver, SearchStats};
pub use params::{SearchParams, DEFAULT_MOVES_TO_GO};
pub use root::SearchResult;
pub use sort_info::SortInfo;
