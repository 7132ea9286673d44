//! Background search driver.
//!
//! `EngineController` owns a `SearchEngine` and runs its searches on a
//! worker thread, so a front end can keep reading input while the engine
//! thinks and stop it or send a ponderhit at any time.

mod controller;
pub mod time;

pub use controller::{EngineController, SearchJob};
pub use time::TimeControl;
