//! The calculator controller.
//!
//! [`App`] owns every piece of mutable state: the calculator, the history
//! list, preferences and feedback. Input is handled synchronously; history
//! writes are queued to a single background writer that applies them in
//! order and is never awaited on the input path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::calculator::{Action, Calculator, Outcome, Phase, copy_to_clipboard};
use crate::config::Config;
use crate::error::Result;
use crate::feedback::{Cue, Feedback};
use crate::history::{HistoryEntry, HistoryList, HistoryStore, RemoteHistory, RestHistory};
use crate::preferences::{Preferences, Theme};
use crate::storage::LocalStorage;

/// A history write waiting for the background writer.
enum HistoryOp {
    Record {
        entry: HistoryEntry,
        snapshot: HistoryList,
    },
    Clear,
}

pub struct App {
    calculator: Calculator,
    history: HistoryList,
    store: HistoryStore,
    local: Arc<LocalStorage>,
    preferences: Preferences,
    feedback: Feedback,
    error_delay: Duration,
    error_deadline: Option<Instant>,
    queue: Option<UnboundedSender<HistoryOp>>,
    writer: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(
        calculator: Calculator,
        store: HistoryStore,
        local: Arc<LocalStorage>,
        mut feedback: Feedback,
        error_delay: Duration,
    ) -> Self {
        let preferences = Preferences::load(&local);
        feedback.set_sound(preferences.sound);

        Self {
            calculator,
            history: HistoryList::new(),
            store,
            local,
            preferences,
            feedback,
            error_delay,
            error_deadline: None,
            queue: None,
            writer: None,
        }
    }

    /// Build the app from configuration. With `offline` the remote store is
    /// ignored even when configured.
    pub fn from_config(config: &Config, offline: bool, feedback: Feedback) -> Self {
        let local = Arc::new(match config.storage_path() {
            Some(path) => LocalStorage::open(path),
            None => {
                warn!("No data directory, history will not survive restarts");
                LocalStorage::in_memory()
            }
        });

        let remote: Option<Arc<dyn RemoteHistory>> = match &config.remote {
            Some(remote_config) if !offline => match RestHistory::new(remote_config) {
                Ok(remote) => Some(Arc::new(remote)),
                Err(e) => {
                    warn!(error = %e, "Remote history disabled");
                    None
                }
            },
            _ => None,
        };

        let store = HistoryStore::new(remote, local.clone());
        info!(remote = store.has_remote(), "History store ready");

        Self::new(
            Calculator::with_undo_limit(config.undo_limit),
            store,
            local,
            feedback,
            config.error_reset_delay(),
        )
    }

    /// Replace the in-memory history with what the store has.
    pub async fn load_history(&mut self) {
        self.history = self.store.load().await;
    }

    /// Handle one input.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let outcome = self.calculator.dispatch(action);
        self.feedback.play(Cue::for_outcome(&outcome));

        match &outcome {
            Outcome::Evaluated(evaluation) => {
                self.error_deadline = None;
                self.record(HistoryEntry::from_evaluation(evaluation));
            }
            Outcome::Failed(_) => {
                self.error_deadline = Some(Instant::now() + self.error_delay);
            }
            Outcome::Updated | Outcome::Unchanged => {
                if self.calculator.phase() != Phase::Error {
                    self.error_deadline = None;
                }
            }
        }

        outcome
    }

    /// When the error display should be reset, if it is showing.
    pub fn error_deadline(&self) -> Option<Instant> {
        self.error_deadline
    }

    /// Reset the error display.
    pub fn recover(&mut self) {
        self.calculator.recover();
        self.error_deadline = None;
    }

    /// Copy a history entry's result onto the display.
    pub fn select_history(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            return false;
        };

        let loaded = self.calculator.load_value(&entry.result);
        if loaded {
            self.error_deadline = None;
        }
        loaded
    }

    /// Clear history everywhere. The in-memory list is cleared immediately.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.enqueue(HistoryOp::Clear);
    }

    /// Copy the display (without separators) to the clipboard.
    pub fn copy_display(&self) -> Result<Option<String>> {
        match self.calculator.clipboard_text() {
            Some(text) => {
                copy_to_clipboard(text)?;
                Ok(Some(text.to_string()))
            }
            None => Ok(None),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.theme = theme;
        self.preferences.save(&self.local);
    }

    pub fn set_sound(&mut self, enabled: bool) {
        self.preferences.sound = enabled;
        self.feedback.set_sound(enabled);
        self.preferences.save(&self.local);
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Wait until every queued history write has been applied. A later
    /// write starts a new writer.
    pub async fn flush(&mut self) {
        self.queue = None;

        if let Some(writer) = self.writer.take()
            && let Err(e) = writer.await
        {
            warn!(error = %e, "History writer failed");
        }
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry.clone());

        let snapshot = self.history.clone();
        self.enqueue(HistoryOp::Record { entry, snapshot });
    }

    fn enqueue(&mut self, op: HistoryOp) {
        if self.queue.is_none() {
            let (sender, receiver) = mpsc::unbounded_channel();
            self.writer = Some(tokio::spawn(write_history(self.store.clone(), receiver)));
            self.queue = Some(sender);
            debug!("Started history writer");
        }

        if let Some(queue) = &self.queue
            && queue.send(op).is_err()
        {
            warn!("History writer stopped, update dropped");
        }
    }
}

/// Apply history writes one at a time, in the order they were queued.
async fn write_history(store: HistoryStore, mut queue: UnboundedReceiver<HistoryOp>) {
    while let Some(op) = queue.recv().await {
        match op {
            HistoryOp::Record { entry, snapshot } => store.record(&entry, &snapshot).await,
            HistoryOp::Clear => store.clear().await,
        }
    }
}
