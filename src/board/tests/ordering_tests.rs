//! Tests for fractional rank computation and normalization.

use crate::board::domain::{DropPosition, NewTask, Task, TaskStatus, ordering};
use mockable::DefaultClock;
use rstest::rstest;

fn task_at(title: &str, status: TaskStatus, order: f64) -> Task {
    let draft = NewTask::new(title, status).expect("valid draft");
    Task::from_draft(draft, order, &DefaultClock)
}

fn todo_lane(orders: &[f64]) -> Vec<Task> {
    orders
        .iter()
        .enumerate()
        .map(|(index, &order)| task_at(&format!("task-{index}"), TaskStatus::Todo, order))
        .collect()
}

#[rstest]
fn append_order_is_zero_for_empty_lane() {
    assert!((ordering::append_order(&[]) - 0.0).abs() < f64::EPSILON);
}

#[rstest]
fn append_order_is_one_past_the_maximum() {
    let lane = todo_lane(&[0.0, 1.0, 2.0]);
    assert!((ordering::append_order(&lane) - 3.0).abs() < f64::EPSILON);
}

#[rstest]
fn insertion_without_target_appends() {
    let lane = todo_lane(&[0.0, 1.0]);
    let order = ordering::insertion_order(&lane, None, DropPosition::Before);
    assert!((order - 2.0).abs() < f64::EPSILON);
}

#[rstest]
fn insertion_with_unknown_target_appends() {
    let lane = todo_lane(&[0.0, 1.0]);
    let stranger = task_at("elsewhere", TaskStatus::Done, 0.0);
    let order = ordering::insertion_order(&lane, Some(stranger.id()), DropPosition::Before);
    assert!((order - 2.0).abs() < f64::EPSILON);
}

#[rstest]
fn insert_before_lands_between_predecessor_and_target() {
    let lane = todo_lane(&[0.0, 1.0, 2.0]);
    let target = lane.get(1).expect("lane has three tasks");
    let order = ordering::insertion_order(&lane, Some(target.id()), DropPosition::Before);
    assert!(order > 0.0 && order < 1.0);
    assert!((order - 0.5).abs() < f64::EPSILON);
}

#[rstest]
fn insert_before_first_goes_below_the_minimum() {
    let lane = todo_lane(&[0.0, 1.0]);
    let first = lane.first().expect("lane has two tasks");
    let order = ordering::insertion_order(&lane, Some(first.id()), DropPosition::Before);
    assert!((order - -1.0).abs() < f64::EPSILON);
}

#[rstest]
fn insert_after_lands_between_target_and_successor() {
    let lane = todo_lane(&[0.0, 1.0, 2.0]);
    let target = lane.first().expect("lane has three tasks");
    let order = ordering::insertion_order(&lane, Some(target.id()), DropPosition::After);
    assert!(order > 0.0 && order < 1.0);
}

#[rstest]
fn insert_after_last_goes_past_the_target() {
    let lane = todo_lane(&[0.0, 1.0]);
    let last = lane.get(1).expect("lane has two tasks");
    let order = ordering::insertion_order(&lane, Some(last.id()), DropPosition::After);
    assert!((order - 2.0).abs() < f64::EPSILON);
}

#[rstest]
#[case(&[-0.5, 1.0], true)]
#[case(&[0.0005, 1.0], true)]
#[case(&[0.0, 1.0, 2.0], false)]
#[case(&[0.5, 1.0], false)]
fn normalization_trigger_matches_drift_thresholds(#[case] orders: &[f64], #[case] expected: bool) {
    let lane = todo_lane(orders);
    assert_eq!(ordering::needs_normalization(&lane), expected);
}

#[rstest]
fn normalize_assigns_dense_integer_ranks_per_lane() {
    let mut tasks = vec![
        task_at("a", TaskStatus::Todo, -1.0),
        task_at("b", TaskStatus::Todo, 0.25),
        task_at("c", TaskStatus::Todo, 7.0),
        task_at("d", TaskStatus::Done, 3.5),
    ];
    ordering::normalize(&mut tasks);

    let todo = ordering::lane_of(&tasks, TaskStatus::Todo, None);
    let ranks: Vec<f64> = todo.iter().map(Task::order).collect();
    assert_eq!(ranks, vec![0.0, 1.0, 2.0]);
    let titles: Vec<&str> = todo.iter().map(Task::title).collect();
    assert_eq!(titles, vec!["a", "b", "c"]);

    let done = ordering::lane_of(&tasks, TaskStatus::Done, None);
    assert_eq!(done.iter().map(Task::order).collect::<Vec<_>>(), vec![0.0]);
}

#[rstest]
fn normalize_is_idempotent() {
    let mut tasks = vec![
        task_at("a", TaskStatus::Todo, -2.0),
        task_at("b", TaskStatus::Todo, 0.125),
        task_at("c", TaskStatus::InProgress, 9.0),
    ];
    ordering::normalize(&mut tasks);
    let once = tasks.clone();
    ordering::normalize(&mut tasks);
    assert_eq!(tasks, once);
}
