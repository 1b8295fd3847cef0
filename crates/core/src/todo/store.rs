//! Keyed todo collection over an injected persistence medium.

use crate::error::CoordResult;
use crate::store::TodoMedium;
use records::{TodoList, TodoRecord, TodoUpdate};
use std::sync::Arc;
use tracing::warn;

/// A dietitian's todo collection.
///
/// The medium stores the whole collection as one JSON blob; every operation
/// reads it wholesale, mutates in memory and writes it back. A missing or
/// unreadable blob reads as the empty collection, never an error.
pub struct TodoStore {
    medium: Arc<dyn TodoMedium + Send + Sync>,
}

impl TodoStore {
    pub fn new(medium: Arc<dyn TodoMedium + Send + Sync>) -> Self {
        Self { medium }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Loads the full collection.
    ///
    /// An absent medium yields the empty list. A blob that no longer parses
    /// is logged and treated as empty rather than blocking the dashboard.
    pub fn load(&self) -> Vec<TodoRecord> {
        let Some(blob) = self.medium.read() else {
            return Vec::new();
        };
        match TodoList::parse(&blob) {
            Ok(todos) => todos,
            Err(e) => {
                warn!("Stored todo list is unreadable, starting empty: {e}");
                Vec::new()
            }
        }
    }

    /// Adds `record` unless a record with its id already exists.
    ///
    /// Returns `true` when the record was added.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written back.
    pub fn add(&self, record: TodoRecord) -> CoordResult<bool> {
        let mut todos = self.load();
        if todos.iter().any(|t| t.id == record.id) {
            return Ok(false);
        }
        todos.push(record);
        self.save(&todos)?;
        Ok(true)
    }

    /// Applies `update` to the record with `id`.
    ///
    /// Returns `false` when no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written back.
    pub fn update(&self, id: &str, update: TodoUpdate) -> CoordResult<bool> {
        let mut todos = self.load();
        let Some(record) = todos.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        update.apply(record);
        self.save(&todos)?;
        Ok(true)
    }

    /// Removes the record with `id`.
    ///
    /// Returns `false` when no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written back.
    pub fn remove(&self, id: &str) -> CoordResult<bool> {
        let mut todos = self.load();
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Ok(false);
        }
        self.save(&todos)?;
        Ok(true)
    }

    /// The open (not completed) records.
    pub fn active(&self) -> Vec<TodoRecord> {
        self.load().into_iter().filter(|t| !t.is_completed).collect()
    }

    /// The `n` most pressing open records: priority descending, then newest
    /// first within a priority.
    pub fn top(&self, n: usize) -> Vec<TodoRecord> {
        let mut open = self.active();
        open.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        open.truncate(n);
        open
    }

    // ========================================================================
    // Crate-internal helpers
    // ========================================================================

    /// Writes the whole collection back to the medium.
    pub(crate) fn save(&self, todos: &[TodoRecord]) -> CoordResult<()> {
        let blob = TodoList::render(todos)?;
        self.medium.write(&blob)
    }
}
