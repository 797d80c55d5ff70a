//! Calculation history.
//!
//! This module provides:
//! - [`HistoryEntry`] and the capped, most-recent-first [`HistoryList`]
//! - The [`RemoteHistory`] abstraction and its REST implementation
//! - [`HistoryStore`], which falls back to local storage when the remote fails

mod remote;
mod store;

pub use remote::{RemoteHistory, RestHistory, SENTINEL_ID};
pub use store::HistoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculator::Evaluation;

/// Number of entries kept and shown.
pub const HISTORY_LIMIT: usize = 50;

/// One completed calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Identifier assigned by the remote store; absent for local entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub expression: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            id: None,
            expression: expression.into(),
            result: result.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_evaluation(evaluation: &Evaluation) -> Self {
        Self::new(&evaluation.expression, &evaluation.display_result)
    }
}

/// In-memory history, most recent first, capped at [`HISTORY_LIMIT`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryList {
    entries: Vec<HistoryEntry>,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from entries already ordered most recent first.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    /// Add an entry at the front, dropping the oldest past the cap.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
