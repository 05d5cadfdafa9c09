//! Fractional rank computation and periodic normalization.
//!
//! Tasks carry a real-valued `order` so an insert between two neighbours
//! only touches the moved task: the new rank is the midpoint of the
//! neighbouring ranks. Repeated midpoint insertion erodes precision, so
//! ranks are periodically rewritten as dense integers. The erosion check
//! runs lazily, only on the reorder path, because that is the only place
//! new midpoints are minted.

#![expect(
    clippy::float_arithmetic,
    reason = "Fractional ranks are the module's entire purpose"
)]

use super::{Task, TaskId, TaskStatus};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Orders in `(0, NORMALIZE_EPSILON)` trip normalization before midpoint
/// precision runs out.
const NORMALIZE_EPSILON: f64 = 1e-3;

/// Where a dragged task lands relative to its drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    /// Insert immediately before the target.
    Before,
    /// Insert immediately after the target.
    After,
}

/// Compares two tasks by rank, suitable for lane sorting.
#[must_use]
pub fn by_order(a: &Task, b: &Task) -> Ordering {
    a.order().total_cmp(&b.order())
}

/// Returns the rank for appending to a lane: one past the current maximum,
/// or `0.0` for an empty lane.
#[must_use]
pub fn append_order(lane: &[Task]) -> f64 {
    lane.iter()
        .map(Task::order)
        .fold(None::<f64>, |max, order| {
            Some(max.map_or(order, |current| current.max(order)))
        })
        .map_or(0.0, |max| max + 1.0)
}

/// Computes the rank for inserting into `lane` relative to `target`.
///
/// `lane` must be sorted by rank and must not contain the task being
/// moved. A missing or absent target appends. `Before` takes the midpoint
/// with the predecessor, or one below the lane minimum when the target is
/// first. `After` takes the midpoint with the successor, or one past the
/// target when it is last. Dropping a task onto itself is the caller's
/// no-op to detect.
#[must_use]
pub fn insertion_order(lane: &[Task], target: Option<TaskId>, position: DropPosition) -> f64 {
    let Some(target_id) = target else {
        return append_order(lane);
    };
    let Some(index) = lane.iter().position(|task| task.id() == target_id) else {
        return append_order(lane);
    };
    let Some(target_task) = lane.get(index) else {
        return append_order(lane);
    };

    match position {
        DropPosition::Before => index.checked_sub(1).and_then(|i| lane.get(i)).map_or(
            target_task.order() - 1.0,
            |predecessor| (predecessor.order() + target_task.order()) / 2.0,
        ),
        DropPosition::After => lane.get(index + 1).map_or(
            target_task.order() + 1.0,
            |successor| (target_task.order() + successor.order()) / 2.0,
        ),
    }
}

/// Returns `true` when any rank has drifted out of the healthy range:
/// negative, or positive but below [`NORMALIZE_EPSILON`].
#[must_use]
pub fn needs_normalization<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> bool {
    tasks.into_iter().any(|task| {
        let order = task.order();
        order < 0.0 || (order > 0.0 && order < NORMALIZE_EPSILON)
    })
}

/// Rewrites ranks as dense integers `0..n-1` per status lane, preserving
/// the current lane sequence. Idempotent: an already-normalized set is
/// left bit-for-bit unchanged.
#[expect(
    clippy::cast_precision_loss,
    reason = "Lane sizes are far below the 2^52 contiguous integer range of f64"
)]
pub fn normalize(tasks: &mut [Task]) {
    let mut lanes: BTreeMap<&'static str, Vec<usize>> = BTreeMap::new();
    for (index, task) in tasks.iter().enumerate() {
        lanes.entry(task.status().as_str()).or_default().push(index);
    }

    for indices in lanes.into_values() {
        let mut ranked = indices;
        ranked.sort_by(|&a, &b| {
            let left = tasks.get(a).map_or(0.0, Task::order);
            let right = tasks.get(b).map_or(0.0, Task::order);
            left.total_cmp(&right)
        });
        for (rank, index) in ranked.into_iter().enumerate() {
            if let Some(task) = tasks.get_mut(index) {
                task.set_order(rank as f64);
            }
        }
    }
}

/// Sorts a lane's tasks by rank, breaking ties stably by insertion order
/// of the input.
#[must_use]
pub fn sorted_lane(mut lane: Vec<Task>) -> Vec<Task> {
    lane.sort_by(by_order);
    lane
}

/// Extracts `status`-lane tasks from an unordered collection, sorted by
/// rank and excluding `excluded` (the task being moved, if any).
#[must_use]
pub fn lane_of<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    status: TaskStatus,
    excluded: Option<TaskId>,
) -> Vec<Task> {
    let lane: Vec<Task> = tasks
        .into_iter()
        .filter(|task| task.status() == status && Some(task.id()) != excluded)
        .cloned()
        .collect();
    sorted_lane(lane)
}
