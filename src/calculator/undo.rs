//! Undo/redo stacks of display snapshots.

/// Default number of snapshots kept for undo.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Undo and redo stacks. Recording a new snapshot clears redo.
#[derive(Clone, Debug)]
pub struct UndoHistory<T: Clone> {
    past: Vec<T>,
    future: Vec<T>,
    max_size: usize,
}

impl<T: Clone> Default for UndoHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LIMIT)
    }
}

impl<T: Clone> UndoHistory<T> {
    pub fn new(max_size: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record the state before a forward action.
    pub fn record(&mut self, state: T) {
        self.future.clear();
        self.past.push(state);

        if self.past.len() > self.max_size {
            let excess = self.past.len() - self.max_size;
            self.past.drain(..excess);
        }
    }

    /// Step back: `current` moves to redo, the previous state is returned.
    pub fn undo(&mut self, current: T) -> Option<T> {
        self.past.pop().map(|previous| {
            self.future.push(current);
            previous
        })
    }

    /// Step forward: `current` moves to undo, the next state is returned.
    pub fn redo(&mut self, current: T) -> Option<T> {
        self.future.pop().map(|next| {
            self.past.push(current);
            next
        })
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_is_empty() {
        let history: UndoHistory<i32> = UndoHistory::new(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo_restores() {
        let mut history = UndoHistory::new(10);
        history.record("1");
        history.record("12");

        assert_eq!(history.undo("123"), Some("12"));
        assert_eq!(history.redo("12"), Some("123"));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history: UndoHistory<&str> = UndoHistory::new(10);
        assert_eq!(history.undo("0"), None);
        assert_eq!(history.redo("0"), None);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = UndoHistory::new(10);
        history.record(1);
        let _ = history.undo(2);
        assert!(history.can_redo());

        history.record(3);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_respects_max_size() {
        let mut history = UndoHistory::new(3);
        for i in 0..5 {
            history.record(i);
        }
        assert_eq!(history.undo(5), Some(4));
        assert_eq!(history.undo(4), Some(3));
        assert_eq!(history.undo(3), Some(2));
        assert_eq!(history.undo(2), None);
    }
}
