//! Confirmation port for reorder durability.

use crate::board::domain::{TaskId, TaskStatus};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for confirmation calls.
pub type ConfirmationResult<T> = Result<T, ConfirmationError>;

/// Asynchronous boundary confirming optimistic reorders.
///
/// The collaborator owns latency and failure probability; the core issues
/// exactly one single-shot call per reorder, with no retry and no
/// cancellation. A rejection triggers rollback at the coordinator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationApi: Send + Sync {
    /// Confirms a reorder of `task_id` into `new_status` at `new_order`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationError::Rejected`] when the collaborator
    /// refuses the reorder.
    async fn confirm_reorder(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
        new_order: f64,
    ) -> ConfirmationResult<()>;
}

/// Errors returned by confirmation collaborators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfirmationError {
    /// The collaborator rejected the reorder.
    #[error("reorder of task {0} was rejected")]
    Rejected(TaskId),
}
