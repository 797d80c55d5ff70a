//! Calculator engine.
//!
//! This module provides:
//! - Input normalization from keys and buttons into [`Action`]s
//! - Strict left-to-right expression evaluation
//! - Scientific functions, the memory register and undo/redo
//! - The [`Calculator`] state machine tying them together
//! - Copying the display to the clipboard

mod clipboard;
mod engine;
mod evaluation;
pub mod format;
mod input;
mod memory;
mod scientific;
mod undo;

pub use clipboard::copy_to_clipboard;
pub use engine::{Calculator, ERROR_RESET_DELAY, ERROR_TEXT, MAX_INPUT_DIGITS, Outcome, Phase};
pub use evaluation::{EvalError, Evaluation, evaluate, evaluate_expression};
pub use input::{Action, MemoryOp, Operator, ScientificFn, UnknownInput, parse_tokens, to_arithmetic};
pub use memory::MemoryRegister;
pub use scientific::apply_scientific;
pub use undo::{DEFAULT_UNDO_LIMIT, UndoHistory};
