//! Unit tests for the board module.
//!
//! Tests are organised by component: pure ordering and history logic,
//! store entry points, the optimistic reorder coordinator, conflict
//! resolution, and persistence round-trips.

mod history_tests;
mod ordering_tests;

use crate::board::adapters::memory::{RecordingNotificationSink, SimulatedConfirmationApi};
use crate::board::domain::{NewTask, Task, TaskStatus};
use crate::board::services::BoardService;
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;

type TestBoard = BoardService<SimulatedConfirmationApi, RecordingNotificationSink, DefaultClock>;

/// Board with a zero-latency, always-confirming collaborator.
fn reliable_board() -> (TestBoard, Arc<RecordingNotificationSink>) {
    board_with(SimulatedConfirmationApi::new(Duration::ZERO, 0.0))
}

/// Board with a zero-latency, always-rejecting collaborator.
fn failing_board() -> (TestBoard, Arc<RecordingNotificationSink>) {
    board_with(SimulatedConfirmationApi::new(Duration::ZERO, 1.0))
}

fn board_with(confirmation: SimulatedConfirmationApi) -> (TestBoard, Arc<RecordingNotificationSink>) {
    let notifications = Arc::new(RecordingNotificationSink::new());
    let board = BoardService::new(
        Arc::new(confirmation),
        Arc::clone(&notifications),
        Arc::new(DefaultClock),
    );
    (board, notifications)
}

/// Creates a task in the given lane through the service entry point.
fn seed_task<C, N, K>(board: &BoardService<C, N, K>, title: &str, status: TaskStatus) -> Task
where
    C: crate::board::ports::ConfirmationApi,
    N: crate::board::ports::NotificationSink,
    K: mockable::Clock + Send + Sync,
{
    board.create_task(NewTask::new(title, status).expect("valid draft"))
}
