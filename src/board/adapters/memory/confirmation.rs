//! Simulated confirmation API with latency and failure probability.

use crate::board::domain::{TaskId, TaskStatus};
use crate::board::ports::{ConfirmationApi, ConfirmationError, ConfirmationResult};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Default simulated network latency per confirmation attempt.
const DEFAULT_LATENCY: Duration = Duration::from_secs(2);

/// In-process confirmation collaborator.
///
/// Sleeps for the configured latency, then rolls against the failure
/// probability. Each attempt is single-shot: one latency period, one
/// pass/fail outcome.
#[derive(Debug, Clone)]
pub struct SimulatedConfirmationApi {
    latency: Duration,
    failure_probability: f64,
}

impl SimulatedConfirmationApi {
    /// Creates a collaborator with the given latency and failure
    /// probability in `[0.0, 1.0]` (clamped).
    #[must_use]
    pub fn new(latency: Duration, failure_probability: f64) -> Self {
        Self {
            latency,
            failure_probability: failure_probability.clamp(0.0, 1.0),
        }
    }

    /// Collaborator that always confirms after the default latency.
    #[must_use]
    pub const fn reliable() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            failure_probability: 0.0,
        }
    }

    /// Collaborator that always rejects after the default latency.
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            failure_probability: 1.0,
        }
    }

    /// Configured latency per attempt.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedConfirmationApi {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY, 0.1)
    }
}

#[async_trait]
impl ConfirmationApi for SimulatedConfirmationApi {
    async fn confirm_reorder(
        &self,
        task_id: TaskId,
        _new_status: TaskStatus,
        _new_order: f64,
    ) -> ConfirmationResult<()> {
        tokio::time::sleep(self.latency).await;
        // The rng is created after the await point; thread_rng is not Send.
        let failed = rand::thread_rng().gen_bool(self.failure_probability);
        if failed {
            return Err(ConfirmationError::Rejected(task_id));
        }
        Ok(())
    }
}
