//! Domain model for the task board.
//!
//! Pure types and algorithms with no infrastructure dependencies: the task
//! entity and its value types, field-level patches, fractional-rank
//! ordering, and the bounded undo/redo history.

mod error;
mod history;
mod ids;
mod patch;
mod task;

pub mod ordering;

pub use error::{BoardDomainError, ParsePriorityError, ParseTaskStatusError};
pub use history::{HISTORY_CAPACITY, History, HistoryAction};
pub use ids::TaskId;
pub use ordering::DropPosition;
pub use patch::{FieldUpdate, TaskField, TaskPatch};
pub use task::{NewTask, Priority, Task, TaskStatus};
