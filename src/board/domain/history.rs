//! Bounded undo/redo history of invertible mutations.

use super::{Task, TaskId, TaskPatch, TaskStatus};
use std::collections::VecDeque;

/// Maximum number of recorded actions retained for undo.
pub const HISTORY_CAPACITY: usize = 50;

/// One recorded store mutation, carrying enough state to be applied in
/// either direction without consulting the live store.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction {
    /// A task was created.
    Create {
        /// The created entity, stored whole so redo reinserts it
        /// verbatim (same id, same order).
        task: Task,
    },
    /// A task's fields were updated.
    Update {
        /// The updated task.
        task_id: TaskId,
        /// Prior values of exactly the touched fields.
        previous: TaskPatch,
        /// New values of exactly the touched fields.
        new: TaskPatch,
    },
    /// A task was deleted.
    Delete {
        /// The deleted entity, stored whole for reinsertion on undo.
        task: Task,
    },
    /// A task was moved between or within lanes.
    Reorder {
        /// The moved task.
        task_id: TaskId,
        /// Lane before the move.
        previous_status: TaskStatus,
        /// Rank before the move.
        previous_order: f64,
        /// Lane after the move.
        new_status: TaskStatus,
        /// Rank after the move.
        new_order: f64,
    },
}

impl HistoryAction {
    /// Returns a short human-readable summary of the action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Create { task } => format!("create '{}'", task.title()),
            Self::Update { new, .. } => {
                let fields: Vec<&str> = new
                    .field_set()
                    .into_iter()
                    .map(|field| field.as_str())
                    .collect();
                format!("update {}", fields.join(", "))
            }
            Self::Delete { task } => format!("delete '{}'", task.title()),
            Self::Reorder { new_status, .. } => format!("move to {}", new_status.as_str()),
        }
    }
}

/// Undo/redo state machine over recorded actions.
///
/// `past` holds at most [`HISTORY_CAPACITY`] actions, oldest evicted
/// first. `future` is populated only by undo and cleared by any newly
/// recorded forward action. The replay flag suppresses recording while an
/// undo or redo is being applied, so the inverse is not captured as a new
/// forward action.
#[derive(Debug, Clone, Default)]
pub struct History {
    past: VecDeque<HistoryAction>,
    future: Vec<HistoryAction>,
    replaying: bool,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a forward action.
    ///
    /// No-op while a replay is in progress. Otherwise evicts the oldest
    /// action beyond capacity and unconditionally clears the redo stack.
    pub fn record(&mut self, action: HistoryAction) {
        if self.replaying {
            return;
        }
        self.past.push_back(action);
        if self.past.len() > HISTORY_CAPACITY {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Pops the most recent action for inversion, moving it to the redo
    /// stack. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<HistoryAction> {
        let action = self.past.pop_back()?;
        self.future.push(action.clone());
        Some(action)
    }

    /// Pops the most recently undone action for reapplication, moving it
    /// back to the undo stack. Returns `None` when there is nothing to
    /// redo.
    pub fn redo(&mut self) -> Option<HistoryAction> {
        let action = self.future.pop()?;
        self.past.push_back(action.clone());
        Some(action)
    }

    /// Marks the start or end of undo/redo application.
    pub const fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    /// Returns `true` while an undo/redo is being applied.
    #[must_use]
    pub const fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Returns `true` when an action is available to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Returns `true` when an action is available to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Describes the action the next undo would invert, whenever one is
    /// available.
    #[must_use]
    pub fn undo_description(&self) -> Option<String> {
        self.past.back().map(HistoryAction::description)
    }

    /// Describes the action the next redo would reapply, whenever one is
    /// available.
    #[must_use]
    pub fn redo_description(&self) -> Option<String> {
        self.future.last().map(HistoryAction::description)
    }

    /// Number of recorded forward actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.past.len()
    }

    /// Returns `true` when no forward actions are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.past.is_empty()
    }

    /// Oldest recorded action still retained, used to verify eviction.
    #[must_use]
    pub fn oldest(&self) -> Option<&HistoryAction> {
        self.past.front()
    }
}
