//! Simulated external actor and conflict resolution.
//!
//! The actor fires on a jittered timer, mutates one random task the way a
//! remote collaborator would, and lets the board merge when the mutation
//! collides with the in-progress local edit. Every simulated mutation is
//! value-replacing: it swaps status, priority, or assignee for another
//! concrete value and never appends to or grows any field.

use super::board::{BoardService, ExternalUpdateOutcome};
use crate::board::domain::{Priority, TaskField, TaskPatch, TaskStatus};
use crate::board::ports::{ConfirmationApi, NotificationSink, Severity};
use mockable::Clock;
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Kinds of mutation the external actor can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
    StatusChange,
    PriorityChange,
    AssigneeChange,
}

const MUTATION_KINDS: [MutationKind; 3] = [
    MutationKind::StatusChange,
    MutationKind::PriorityChange,
    MutationKind::AssigneeChange,
];

/// Names the remote collaborators the actor assigns tasks to.
const ASSIGNEE_ROSTER: [&str; 5] = ["alex", "casey", "jordan", "riley", "sam"];

/// Timer window for the external actor.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Shortest wait between ticks.
    pub min_interval: Duration,
    /// Longest wait between ticks.
    pub max_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(15),
            max_interval: Duration::from_secs(25),
        }
    }
}

/// Timer-driven simulated external actor.
///
/// Holds a handle to the board it mutates and its own notification sink:
/// one `info` notification per clean external update, one `warning` per
/// conflict merge, and nothing otherwise.
pub struct ExternalActor<C, N, K>
where
    C: ConfirmationApi,
    N: NotificationSink,
    K: Clock + Send + Sync,
{
    board: BoardService<C, N, K>,
    notifications: Arc<N>,
    config: SimulationConfig,
}

impl<C, N, K> ExternalActor<C, N, K>
where
    C: ConfirmationApi,
    N: NotificationSink,
    K: Clock + Send + Sync,
{
    /// Creates an actor over the given board.
    #[must_use]
    pub const fn new(
        board: BoardService<C, N, K>,
        notifications: Arc<N>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            board,
            notifications,
            config,
        }
    }

    /// Runs the actor until dropped: sleep a random interval inside the
    /// configured window, then apply one tick.
    pub async fn run(self) {
        loop {
            tokio::time::sleep(self.random_interval()).await;
            self.tick();
        }
    }

    /// Applies a single external mutation to one random task.
    ///
    /// Exposed separately so tests can drive the actor deterministically
    /// without the timer.
    pub fn tick(&self) {
        let tasks = self.board.tasks();
        let picked = {
            let mut rng = rand::thread_rng();
            tasks
                .choose(&mut rng)
                .map(|task| (task.id(), task.title().to_owned(), random_patch(&mut rng)))
        };
        let Some((task_id, title, patch)) = picked else {
            return;
        };
        let touched = field_labels(&patch);

        match self.board.apply_external_update(task_id, patch) {
            ExternalUpdateOutcome::Applied => self.notifications.notify(
                Severity::Info,
                &format!("'{title}' was updated by another user ({touched})"),
                None,
            ),
            ExternalUpdateOutcome::Merged { fields } => {
                let overlap: Vec<&str> = fields.iter().map(|field| field.as_str()).collect();
                self.notifications.notify(
                    Severity::Warning,
                    &format!(
                        "Your edit of '{title}' collided with a remote change; remote values kept for {}",
                        overlap.join(", ")
                    ),
                    None,
                );
            }
            ExternalUpdateOutcome::Missing => {
                debug!(task_id = %task_id, "external update targeted a vanished task");
            }
        }
    }

    /// Draws a wait uniformly from the configured window.
    fn random_interval(&self) -> Duration {
        let min = u64::try_from(self.config.min_interval.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.config.max_interval.as_millis()).unwrap_or(u64::MAX);
        if max <= min {
            return Duration::from_millis(min);
        }
        let millis = rand::thread_rng().gen_range(min..=max);
        Duration::from_millis(millis)
    }
}

/// Builds one value-replacing mutation of a random kind.
fn random_patch(rng: &mut impl Rng) -> TaskPatch {
    let kind = MUTATION_KINDS
        .choose(rng)
        .copied()
        .unwrap_or(MutationKind::StatusChange);
    match kind {
        MutationKind::StatusChange => TaskPatch::new().with_status(
            TaskStatus::ALL
                .choose(rng)
                .copied()
                .unwrap_or(TaskStatus::Todo),
        ),
        MutationKind::PriorityChange => TaskPatch::new().with_priority(
            Priority::ALL.choose(rng).copied().unwrap_or(Priority::Medium),
        ),
        MutationKind::AssigneeChange => TaskPatch::new().with_assignee(
            ASSIGNEE_ROSTER
                .choose(rng)
                .copied()
                .unwrap_or("alex")
                .to_owned(),
        ),
    }
}

/// Comma-joined labels of the fields a patch touches.
fn field_labels(patch: &TaskPatch) -> String {
    let labels: Vec<&str> = patch
        .field_set()
        .into_iter()
        .map(TaskField::as_str)
        .collect();
    labels.join(", ")
}
