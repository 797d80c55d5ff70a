//! calcdesk: a keyboard-driven calculator with memory, undo/redo and
//! persistent history.
//!
//! Expressions evaluate strictly left to right (`2 + 3 × 4 = 20`). Completed
//! calculations are kept in a history that is written to a remote record
//! store when one is configured, and to local storage otherwise.

pub mod app;
pub mod calculator;
pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod preferences;
pub mod repl;
pub mod storage;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
