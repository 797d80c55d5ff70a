//! The calculator state machine.
//!
//! [`Calculator`] owns the display buffer, the pending expression, the
//! memory register and the undo/redo stacks. Every input goes through
//! [`Calculator::dispatch`], which is synchronous and never fails: errors
//! become the transient [`Phase::Error`] state.

use std::time::Duration;

use tracing::debug;

use super::evaluation::{EvalError, Evaluation, evaluate_expression};
use super::format::{format_number, group_thousands, parse_display, strip_separators};
use super::input::{Action, MemoryOp, Operator, ScientificFn};
use super::memory::MemoryRegister;
use super::scientific::apply_scientific;
use super::undo::{DEFAULT_UNDO_LIMIT, UndoHistory};

/// Text shown while the calculator is in the error state.
pub const ERROR_TEXT: &str = "Error";

/// How long the error text stays up before the display resets.
pub const ERROR_RESET_DELAY: Duration = Duration::from_millis(1500);

/// Digits accepted in a single operand. Every 15-digit integer is exact
/// in an `f64`.
pub const MAX_INPUT_DIGITS: usize = 15;

/// Where the calculator is in its input cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Showing a result (or `0`); the next digit starts a new operand.
    Idle,
    /// Digits are being typed into the display.
    Entering,
    /// An evaluation failed; waiting for [`Calculator::recover`].
    Error,
}

/// What a dispatched action produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// State changed, nothing else to report.
    Updated,
    /// Undo/redo with an empty source stack, or `=` with nothing pending.
    Unchanged,
    /// `=` succeeded; the caller records it in the history.
    Evaluated(Evaluation),
    /// Evaluation or a scientific function failed; the display shows the
    /// error text until recovered.
    Failed(EvalError),
}

#[derive(Debug)]
pub struct Calculator {
    buffer: String,
    pending: Vec<(String, Operator)>,
    awaiting_operand: bool,
    phase: Phase,
    memory: MemoryRegister,
    undo: UndoHistory<String>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_undo_limit(DEFAULT_UNDO_LIMIT)
    }

    pub fn with_undo_limit(limit: usize) -> Self {
        Self {
            buffer: "0".to_string(),
            pending: Vec::new(),
            awaiting_operand: false,
            phase: Phase::Idle,
            memory: MemoryRegister::new(),
            undo: UndoHistory::new(limit),
        }
    }

    /// Process one input.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        debug!(%action, phase = ?self.phase, "dispatch");

        if self.phase == Phase::Error {
            self.recover();
        }

        if action.is_forward() {
            self.undo.record(self.buffer.clone());
        }

        let awaiting = std::mem::take(&mut self.awaiting_operand);

        match action {
            Action::Digit(d) => self.push_digit(d),
            Action::Decimal => self.push_decimal(),
            Action::Operator(op) => self.push_operator(op, awaiting),
            Action::Equals => return self.equals(),
            Action::Clear => self.clear(),
            Action::Backspace => self.backspace(),
            Action::Memory(op) => self.memory_op(op),
            Action::Scientific(func) => return self.scientific(func),
            Action::Undo => return self.step_back(),
            Action::Redo => return self.step_forward(),
        }

        Outcome::Updated
    }

    /// Leave the error state, resetting the display to `0`.
    pub fn recover(&mut self) {
        if self.phase == Phase::Error {
            self.buffer = "0".to_string();
            self.phase = Phase::Idle;
        }
    }

    /// Put a previously computed value (e.g. a history result) on the display.
    ///
    /// Returns `false` and leaves the state alone if `text` is not a number.
    pub fn load_value(&mut self, text: &str) -> bool {
        if parse_display(text).is_none() {
            return false;
        }

        self.recover();
        self.undo.record(self.buffer.clone());
        self.buffer = strip_separators(text).trim().to_string();
        self.awaiting_operand = false;
        self.phase = Phase::Idle;
        true
    }

    /// The display as rendered: grouped with separators, or the error text.
    pub fn display(&self) -> String {
        match self.phase {
            Phase::Error => ERROR_TEXT.to_string(),
            _ => group_thousands(&self.buffer),
        }
    }

    /// The raw display buffer, without separators.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The pending expression as shown above the display, e.g. `12 + 5 -`.
    pub fn pending_expression(&self) -> String {
        self.pending
            .iter()
            .map(|(operand, op)| format!("{} {}", operand, op.symbol()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Text for the clipboard; `None` while showing an error.
    pub fn clipboard_text(&self) -> Option<&str> {
        match self.phase {
            Phase::Error => None,
            _ => Some(&self.buffer),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn memory(&self) -> &MemoryRegister {
        &self.memory
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    fn value(&self) -> f64 {
        parse_display(&self.buffer).unwrap_or(0.0)
    }

    fn push_digit(&mut self, digit: char) {
        if self.phase != Phase::Entering {
            self.buffer = digit.to_string();
        } else if self.buffer == "0" {
            self.buffer = digit.to_string();
        } else if self.digit_count() < MAX_INPUT_DIGITS {
            self.buffer.push(digit);
        }
        self.phase = Phase::Entering;
    }

    fn push_decimal(&mut self) {
        if self.phase != Phase::Entering {
            self.buffer = "0.".to_string();
        } else if !self.buffer.contains('.') {
            self.buffer.push('.');
        }
        self.phase = Phase::Entering;
    }

    fn digit_count(&self) -> usize {
        self.buffer.chars().filter(char::is_ascii_digit).count()
    }

    fn push_operator(&mut self, op: Operator, awaiting: bool) {
        match self.pending.last_mut() {
            // Two operators in a row: the second one wins.
            Some(last) if awaiting => last.1 = op,
            _ => self.pending.push((group_thousands(&self.buffer), op)),
        }
        self.awaiting_operand = true;
        self.phase = Phase::Idle;
    }

    fn equals(&mut self) -> Outcome {
        if self.pending.is_empty() {
            self.phase = Phase::Idle;
            return Outcome::Unchanged;
        }

        let expression = format!(
            "{} {}",
            self.pending_expression(),
            group_thousands(&self.buffer)
        );

        match evaluate_expression(&expression) {
            Ok(evaluation) => {
                debug!(%expression, value = evaluation.value, "evaluated");
                self.buffer = evaluation.clipboard_result.clone();
                self.pending.clear();
                self.phase = Phase::Idle;
                Outcome::Evaluated(evaluation)
            }
            Err(err) => self.fail(err),
        }
    }

    fn clear(&mut self) {
        self.buffer = "0".to_string();
        self.pending.clear();
        self.phase = Phase::Idle;
    }

    fn backspace(&mut self) {
        self.buffer.pop();
        if self.buffer.is_empty() || self.buffer == "-" {
            self.buffer = "0".to_string();
        }
        self.phase = Phase::Entering;
    }

    fn memory_op(&mut self, op: MemoryOp) {
        match op {
            MemoryOp::Add => self.memory.add(self.value()),
            MemoryOp::Subtract => self.memory.subtract(self.value()),
            MemoryOp::Recall => self.buffer = format_number(self.memory.recall()),
            MemoryOp::Clear => self.memory.clear(),
        }
        self.phase = Phase::Idle;
    }

    fn scientific(&mut self, func: ScientificFn) -> Outcome {
        match apply_scientific(func, self.value()) {
            Ok(value) => {
                self.buffer = format_number(value);
                self.phase = Phase::Idle;
                Outcome::Updated
            }
            Err(err) => self.fail(err),
        }
    }

    fn step_back(&mut self) -> Outcome {
        match self.undo.undo(self.buffer.clone()) {
            Some(previous) => {
                self.restore(previous);
                Outcome::Updated
            }
            None => Outcome::Unchanged,
        }
    }

    fn step_forward(&mut self) -> Outcome {
        match self.undo.redo(self.buffer.clone()) {
            Some(next) => {
                self.restore(next);
                Outcome::Updated
            }
            None => Outcome::Unchanged,
        }
    }

    /// Put an undo/redo snapshot back on the display. A snapshot equal to
    /// the last committed operand means the operator is still waiting for
    /// its right-hand side.
    fn restore(&mut self, buffer: String) {
        self.buffer = buffer;

        let committed = self
            .pending
            .last()
            .is_some_and(|(operand, _)| *operand == group_thousands(&self.buffer));
        if committed {
            self.awaiting_operand = true;
            self.phase = Phase::Idle;
        } else {
            self.phase = Phase::Entering;
        }
    }

    fn fail(&mut self, err: EvalError) -> Outcome {
        debug!(error = %err, "evaluation failed");
        self.pending.clear();
        self.phase = Phase::Error;
        Outcome::Failed(err)
    }
}
