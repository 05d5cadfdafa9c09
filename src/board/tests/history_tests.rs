//! Tests for the bounded undo/redo history state machine.

use crate::board::domain::{
    HISTORY_CAPACITY, History, HistoryAction, NewTask, Task, TaskPatch, TaskStatus,
};
use mockable::DefaultClock;
use rstest::rstest;

fn sample_task(title: &str) -> Task {
    let draft = NewTask::new(title, TaskStatus::Todo).expect("valid draft");
    Task::from_draft(draft, 0.0, &DefaultClock)
}

fn create_action(title: &str) -> HistoryAction {
    HistoryAction::Create {
        task: sample_task(title),
    }
}

#[rstest]
fn record_clears_the_redo_stack() {
    let mut history = History::new();
    history.record(create_action("first"));
    let _undone = history.undo();
    assert!(history.can_redo());

    history.record(create_action("second"));
    assert!(!history.can_redo());
}

#[rstest]
fn history_is_bounded_and_evicts_the_oldest_action() {
    let mut history = History::new();
    for index in 0..=HISTORY_CAPACITY {
        history.record(create_action(&format!("task-{index}")));
    }

    assert_eq!(history.len(), HISTORY_CAPACITY);
    let oldest = history.oldest().expect("history is non-empty");
    // task-0 was evicted; the retained window starts at task-1.
    assert_eq!(oldest.description(), "create 'task-1'");
}

#[rstest]
fn undo_and_redo_move_actions_between_stacks() {
    let mut history = History::new();
    history.record(create_action("a"));
    history.record(create_action("b"));

    let undone = history.undo().expect("undo available");
    assert_eq!(undone.description(), "create 'b'");
    assert!(history.can_redo());

    let redone = history.redo().expect("redo available");
    assert_eq!(redone.description(), "create 'b'");
    assert!(!history.can_redo());
    assert_eq!(history.len(), 2);
}

#[rstest]
fn multiple_undos_redo_in_reverse_order() {
    let mut history = History::new();
    history.record(create_action("a"));
    history.record(create_action("b"));
    let _first = history.undo();
    let _second = history.undo();

    // The most recently undone action comes back first.
    let redone = history.redo().expect("redo available");
    assert_eq!(redone.description(), "create 'a'");
}

#[rstest]
fn undo_on_empty_history_returns_nothing() {
    let mut history = History::new();
    assert!(history.undo().is_none());
    assert!(history.redo().is_none());
}

#[rstest]
fn record_is_suppressed_while_replaying() {
    let mut history = History::new();
    history.set_replaying(true);
    history.record(create_action("hidden"));
    history.set_replaying(false);

    assert!(history.is_empty());
    assert!(!history.can_undo());
}

#[rstest]
fn descriptions_are_available_whenever_stacks_are_non_empty() {
    let mut history = History::new();
    assert!(history.undo_description().is_none());
    assert!(history.redo_description().is_none());

    let task = sample_task("write docs");
    history.record(HistoryAction::Create { task: task.clone() });
    history.record(HistoryAction::Update {
        task_id: task.id(),
        previous: TaskPatch::new().with_title("write docs"),
        new: TaskPatch::new().with_title("write the docs"),
    });
    history.record(HistoryAction::Reorder {
        task_id: task.id(),
        previous_status: TaskStatus::Todo,
        previous_order: 0.0,
        new_status: TaskStatus::Done,
        new_order: 1.0,
    });

    assert_eq!(history.undo_description().as_deref(), Some("move to done"));
    let _undone = history.undo();
    assert_eq!(history.undo_description().as_deref(), Some("update title"));
    assert_eq!(history.redo_description().as_deref(), Some("move to done"));
    let _also_undone = history.undo();
    assert_eq!(
        history.undo_description().as_deref(),
        Some("create 'write docs'")
    );
}
