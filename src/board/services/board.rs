//! Task store entry points and the optimistic reorder coordinator.

use crate::board::domain::{
    DropPosition, History, HistoryAction, NewTask, Task, TaskField, TaskId, TaskPatch, TaskStatus,
    ordering,
};
use crate::board::ports::{
    ConfirmationApi, KeyValueError, KeyValueStore, NotificationSink, Severity,
};
use mockable::Clock;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Key the board collection is persisted under.
pub const BOARD_STORAGE_KEY: &str = "pegboard.board";

/// Outcome of an optimistic reorder operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The confirmation succeeded and the move was recorded.
    Committed,
    /// The confirmation was rejected; the task's previous lane and rank
    /// were restored.
    RolledBack,
    /// The request referenced a missing task or dropped a task onto
    /// itself; nothing happened.
    Skipped,
}

/// Outcome of applying an externally originated update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalUpdateOutcome {
    /// No local edit overlapped; the update was applied as-is.
    Applied,
    /// The update collided with the in-progress local edit and was merged
    /// last-write-wins; `fields` names the overlap.
    Merged {
        /// Fields where the external change overrode the local edit.
        fields: BTreeSet<TaskField>,
    },
    /// The target task does not exist.
    Missing,
}

/// Errors from saving or loading the board through the persistence port.
#[derive(Debug, Error)]
pub enum BoardPersistenceError {
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] KeyValueError),
    /// The board collection could not be (de)serialized.
    #[error("board serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Operation-scoped key for a rollback snapshot.
///
/// The sequence number makes keys unique per issued operation, so
/// concurrent reorders never share a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SnapshotKey {
    task_id: TaskId,
    sequence: u64,
}

/// The moved task's pre-move lane, rank, and mutation stamp, held only
/// while the matching confirmation is in flight. Restoring all three makes
/// a rollback a net no-op.
#[derive(Debug, Clone, Copy)]
struct ReorderSnapshot {
    status: TaskStatus,
    order: f64,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// An in-progress local edit the conflict resolver checks against.
#[derive(Debug, Clone)]
struct LocalEdit {
    task_id: TaskId,
    patch: TaskPatch,
}

/// The single source of truth for task state.
#[derive(Debug, Default)]
struct BoardState {
    tasks: HashMap<TaskId, Task>,
    history: History,
    pending: HashSet<TaskId>,
    snapshots: HashMap<SnapshotKey, ReorderSnapshot>,
    local_edit: Option<LocalEdit>,
    reorder_sequence: u64,
}

/// Task board service.
///
/// Owns the mutable task collection and wraps every mutation entry point:
/// ordering via the rank engine, history recording, and optimistic
/// confirmation with rollback for reorders. All synchronous entry points
/// lock the state for their full duration and are therefore atomic with
/// respect to the store; the only suspension point is the confirmation
/// call, which runs with the lock released.
pub struct BoardService<C, N, K>
where
    C: ConfirmationApi,
    N: NotificationSink,
    K: Clock + Send + Sync,
{
    state: Arc<Mutex<BoardState>>,
    confirmation: Arc<C>,
    notifications: Arc<N>,
    clock: Arc<K>,
}

impl<C, N, K> Clone for BoardService<C, N, K>
where
    C: ConfirmationApi,
    N: NotificationSink,
    K: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            confirmation: Arc::clone(&self.confirmation),
            notifications: Arc::clone(&self.notifications),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C, N, K> BoardService<C, N, K>
where
    C: ConfirmationApi,
    N: NotificationSink,
    K: Clock + Send + Sync,
{
    /// Creates an empty board wired to its collaborators.
    #[must_use]
    pub fn new(confirmation: Arc<C>, notifications: Arc<N>, clock: Arc<K>) -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState::default())),
            confirmation,
            notifications,
            clock,
        }
    }

    /// Creates a task at the end of its status lane and records the
    /// creation.
    pub fn create_task(&self, draft: NewTask) -> Task {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let lane = ordering::lane_of(state.tasks.values(), draft.status(), None);
        let order = ordering::append_order(&lane);
        let task = Task::from_draft(draft, order, &*self.clock);
        debug!(task_id = %task.id(), order, "creating task");
        state.tasks.insert(task.id(), task.clone());
        state.history.record(HistoryAction::Create { task: task.clone() });
        task
    }

    /// Applies a field-level patch to a task and records the update.
    ///
    /// Returns the updated task, or `None` (a silent no-op) when the id
    /// is unknown.
    pub fn update_task(&self, task_id: TaskId, patch: TaskPatch) -> Option<Task> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let task = state.tasks.get_mut(&task_id)?;
        if patch.is_empty() {
            return Some(task.clone());
        }
        let previous = patch.capture_from(task);
        patch.apply_to(task);
        task.set_updated_at(self.clock.utc());
        let updated = task.clone();
        debug!(task_id = %task_id, "updating task");
        state.history.record(HistoryAction::Update {
            task_id,
            previous,
            new: patch,
        });
        Some(updated)
    }

    /// Deletes a task and records the deletion.
    ///
    /// Returns `false` (a silent no-op) when the id is unknown. An open
    /// local edit on the task is dropped.
    pub fn delete_task(&self, task_id: TaskId) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(task) = state.tasks.remove(&task_id) else {
            return false;
        };
        if state
            .local_edit
            .as_ref()
            .is_some_and(|edit| edit.task_id == task_id)
        {
            state.local_edit = None;
        }
        debug!(task_id = %task_id, "deleting task");
        state.history.record(HistoryAction::Delete { task });
        true
    }

    /// Moves a task optimistically and awaits external confirmation.
    ///
    /// The move is applied to the store immediately, a rollback snapshot
    /// of the task's previous lane and rank is kept under an
    /// operation-scoped key, and the task id is marked pending. On
    /// confirmation the move is recorded in history; on rejection the
    /// snapshot is restored and a single error notification is raised.
    /// A task deleted while the confirmation is in flight is left
    /// deleted.
    pub async fn reorder_task(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
        target: Option<TaskId>,
        position: DropPosition,
    ) -> ReorderOutcome {
        let Some(issued) = self.apply_reorder(task_id, new_status, target, position) else {
            return ReorderOutcome::Skipped;
        };

        match self
            .confirmation
            .confirm_reorder(task_id, new_status, issued.new_order)
            .await
        {
            Ok(()) => {
                self.commit_reorder(&issued, new_status);
                ReorderOutcome::Committed
            }
            Err(err) => {
                warn!(task_id = %task_id, %err, "reorder rejected, rolling back");
                self.roll_back_reorder(&issued);
                ReorderOutcome::RolledBack
            }
        }
    }

    /// Undoes the most recent recorded action.
    ///
    /// Returns `false` (a silent no-op) when the undo stack is empty.
    pub fn undo(&self) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(action) = state.history.undo() else {
            return false;
        };
        let now = self.clock.utc();
        state.history.set_replaying(true);
        apply_inverse(&mut state.tasks, &action, now);
        state.history.set_replaying(false);
        debug!(action = action.description(), "undid action");
        true
    }

    /// Reapplies the most recently undone action.
    ///
    /// Returns `false` (a silent no-op) when the redo stack is empty.
    pub fn redo(&self) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let Some(action) = state.history.redo() else {
            return false;
        };
        let now = self.clock.utc();
        state.history.set_replaying(true);
        apply_replay(&mut state.tasks, &action, now);
        state.history.set_replaying(false);
        debug!(action = action.description(), "redid action");
        true
    }

    /// Opens a local edit session the conflict resolver checks against.
    ///
    /// Returns `false` when the task does not exist. A newly opened
    /// session replaces any previous one.
    pub fn begin_local_edit(&self, task_id: TaskId, patch: TaskPatch) -> bool {
        let mut guard = self.state.lock();
        if !guard.tasks.contains_key(&task_id) {
            return false;
        }
        guard.local_edit = Some(LocalEdit { task_id, patch });
        true
    }

    /// Discards the open local edit session, if any.
    pub fn cancel_local_edit(&self) {
        self.state.lock().local_edit = None;
    }

    /// Commits the open local edit session through the update entry
    /// point. Returns the updated task, or `None` when no session is
    /// open or its task has vanished.
    pub fn commit_local_edit(&self) -> Option<Task> {
        let edit = self.state.lock().local_edit.take()?;
        self.update_task(edit.task_id, edit.patch)
    }

    /// Applies an update from the simulated external actor.
    ///
    /// When the target is the locally edited task and the field sets
    /// intersect, the result is a last-write-wins merge: local changes
    /// survive on non-overlapping fields, external changes win on the
    /// overlap, and `updated_at` is stamped with the resolution time.
    pub fn apply_external_update(
        &self,
        task_id: TaskId,
        external: TaskPatch,
    ) -> ExternalUpdateOutcome {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let now = self.clock.utc();

        // Check existence first: an update to a vanished task must not
        // consume an open local edit (the task may come back via redo).
        let Some(task) = state.tasks.get_mut(&task_id) else {
            return ExternalUpdateOutcome::Missing;
        };

        let conflicting = state
            .local_edit
            .as_ref()
            .is_some_and(|edit| edit.task_id == task_id && edit.patch.overlaps(&external));
        let local = if conflicting {
            state.local_edit.take().map(|edit| edit.patch)
        } else {
            None
        };

        if let Some(local_patch) = local {
            let overlap: BTreeSet<TaskField> = local_patch
                .field_set()
                .intersection(&external.field_set())
                .copied()
                .collect();
            let combined = local_patch.merged_with(external);
            let previous = combined.capture_from(task);
            combined.apply_to(task);
            task.set_updated_at(now);
            warn!(task_id = %task_id, ?overlap, "merged conflicting external update");
            state.history.record(HistoryAction::Update {
                task_id,
                previous,
                new: combined,
            });
            ExternalUpdateOutcome::Merged { fields: overlap }
        } else {
            let previous = external.capture_from(task);
            external.apply_to(task);
            task.set_updated_at(now);
            debug!(task_id = %task_id, "applied external update");
            state.history.record(HistoryAction::Update {
                task_id,
                previous,
                new: external,
            });
            ExternalUpdateOutcome::Applied
        }
    }

    /// Returns a task by id.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<Task> {
        self.state.lock().tasks.get(&task_id).cloned()
    }

    /// Returns every task, in no particular order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.values().cloned().collect()
    }

    /// Returns a status lane sorted by rank.
    #[must_use]
    pub fn tasks_in_status(&self, status: TaskStatus) -> Vec<Task> {
        ordering::lane_of(self.state.lock().tasks.values(), status, None)
    }

    /// Returns `true` while the task has a confirmation in flight.
    #[must_use]
    pub fn is_pending(&self, task_id: TaskId) -> bool {
        self.state.lock().pending.contains(&task_id)
    }

    /// Returns `true` when an action is available to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.state.lock().history.can_undo()
    }

    /// Returns `true` when an action is available to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.state.lock().history.can_redo()
    }

    /// Describes the next undoable action, whenever one is available.
    #[must_use]
    pub fn undo_description(&self) -> Option<String> {
        self.state.lock().history.undo_description()
    }

    /// Describes the next redoable action, whenever one is available.
    #[must_use]
    pub fn redo_description(&self) -> Option<String> {
        self.state.lock().history.redo_description()
    }

    /// Serializes the task collection to the persistence collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`BoardPersistenceError`] when serialization or the store
    /// fails.
    pub async fn save_board<S: KeyValueStore>(&self, store: &S) -> Result<(), BoardPersistenceError> {
        let tasks: Vec<Task> = {
            let guard = self.state.lock();
            let mut all: Vec<Task> = guard.tasks.values().cloned().collect();
            all.sort_by(|a, b| a.id().cmp(&b.id()));
            all
        };
        let value = serde_json::to_value(&tasks)?;
        store.set(BOARD_STORAGE_KEY, value).await?;
        Ok(())
    }

    /// Replaces the task collection from the persistence collaborator.
    ///
    /// Returns `false` when nothing is stored. Loading resets history,
    /// pending state, and any open local edit; undo does not reach across
    /// a load.
    ///
    /// # Errors
    ///
    /// Returns [`BoardPersistenceError`] when deserialization or the
    /// store fails.
    pub async fn load_board<S: KeyValueStore>(&self, store: &S) -> Result<bool, BoardPersistenceError> {
        let Some(value) = store.get(BOARD_STORAGE_KEY).await? else {
            return Ok(false);
        };
        let tasks: Vec<Task> = serde_json::from_value(value)?;
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.tasks = tasks.into_iter().map(|task| (task.id(), task)).collect();
        state.history = History::new();
        state.pending.clear();
        state.snapshots.clear();
        state.local_edit = None;
        Ok(true)
    }

    /// Applies the optimistic half of a reorder under the lock:
    /// normalization check, rank computation, snapshot, and pending
    /// marking. Returns `None` for a self-drop or unknown id.
    fn apply_reorder(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
        target: Option<TaskId>,
        position: DropPosition,
    ) -> Option<IssuedReorder> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if target == Some(task_id) {
            return None;
        }
        if !state.tasks.contains_key(&task_id) {
            return None;
        }

        // Lazy normalization: ranks are only checked where new midpoints
        // are minted.
        if ordering::needs_normalization(state.tasks.values()) {
            let mut all: Vec<Task> = state.tasks.values().cloned().collect();
            ordering::normalize(&mut all);
            for task in all {
                state.tasks.insert(task.id(), task);
            }
            debug!("normalized lane ranks");
        }

        let lane = ordering::lane_of(state.tasks.values(), new_status, Some(task_id));
        let new_order = ordering::insertion_order(&lane, target, position);

        state.reorder_sequence += 1;
        let key = SnapshotKey {
            task_id,
            sequence: state.reorder_sequence,
        };
        let issued_at = self.clock.utc();
        let task = state.tasks.get_mut(&task_id)?;
        let title = task.title().to_owned();
        state.snapshots.insert(
            key,
            ReorderSnapshot {
                status: task.status(),
                order: task.order(),
                updated_at: task.updated_at(),
            },
        );
        task.set_status(new_status);
        task.set_order(new_order);
        task.set_updated_at(issued_at);
        state.pending.insert(task_id);
        debug!(task_id = %task_id, new_order, "applied optimistic reorder");
        Some(IssuedReorder {
            key,
            new_order,
            title,
        })
    }

    /// Commit half of a confirmed reorder: drop the snapshot, clear
    /// pending, and record history unless the task vanished mid-flight.
    fn commit_reorder(&self, issued: &IssuedReorder, new_status: TaskStatus) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let task_id = issued.key.task_id;
        state.pending.remove(&task_id);
        let Some(snapshot) = state.snapshots.remove(&issued.key) else {
            return;
        };
        if !state.tasks.contains_key(&task_id) {
            // Deleted while the confirmation was in flight; nothing to
            // resurrect.
            return;
        }
        info!(task_id = %task_id, "reorder confirmed");
        state.history.record(HistoryAction::Reorder {
            task_id,
            previous_status: snapshot.status,
            previous_order: snapshot.order,
            new_status,
            new_order: issued.new_order,
        });
    }

    /// Rollback half of a rejected reorder: restore the snapshotted lane,
    /// rank, and mutation stamp for this task only, clear pending, and
    /// raise the single user-visible error. Nothing is recorded in
    /// history.
    fn roll_back_reorder(&self, issued: &IssuedReorder) {
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let task_id = issued.key.task_id;
            state.pending.remove(&task_id);
            if let Some(snapshot) = state.snapshots.remove(&issued.key)
                && let Some(task) = state.tasks.get_mut(&task_id)
            {
                task.set_status(snapshot.status);
                task.set_order(snapshot.order);
                task.set_updated_at(snapshot.updated_at);
            }
        }
        self.notifications.notify(
            Severity::Error,
            &format!(
                "Could not move '{}'; the change was rolled back",
                issued.title
            ),
            None,
        );
    }
}

/// Hand-off between the optimistic apply and the confirmation outcome.
struct IssuedReorder {
    key: SnapshotKey,
    new_order: f64,
    title: String,
}

/// Applies the inverse of a recorded action to the collection.
fn apply_inverse(
    tasks: &mut HashMap<TaskId, Task>,
    action: &HistoryAction,
    now: chrono::DateTime<chrono::Utc>,
) {
    match action {
        HistoryAction::Create { task } => {
            tasks.remove(&task.id());
        }
        HistoryAction::Update {
            task_id, previous, ..
        } => {
            if let Some(task) = tasks.get_mut(task_id) {
                previous.apply_to(task);
                task.set_updated_at(now);
            }
        }
        HistoryAction::Delete { task } => {
            tasks.insert(task.id(), task.clone());
        }
        HistoryAction::Reorder {
            task_id,
            previous_status,
            previous_order,
            ..
        } => {
            if let Some(task) = tasks.get_mut(task_id) {
                task.set_status(*previous_status);
                task.set_order(*previous_order);
                task.set_updated_at(now);
            }
        }
    }
}

/// Reapplies a recorded action to the collection.
fn apply_replay(
    tasks: &mut HashMap<TaskId, Task>,
    action: &HistoryAction,
    now: chrono::DateTime<chrono::Utc>,
) {
    match action {
        HistoryAction::Create { task } => {
            // Reinsert the exact original entity: same id, same order.
            tasks.insert(task.id(), task.clone());
        }
        HistoryAction::Update { task_id, new, .. } => {
            if let Some(task) = tasks.get_mut(task_id) {
                new.apply_to(task);
                task.set_updated_at(now);
            }
        }
        HistoryAction::Delete { task } => {
            tasks.remove(&task.id());
        }
        HistoryAction::Reorder {
            task_id,
            new_status,
            new_order,
            ..
        } => {
            if let Some(task) = tasks.get_mut(task_id) {
                task.set_status(*new_status);
                task.set_order(*new_order);
                task.set_updated_at(now);
            }
        }
    }
}
