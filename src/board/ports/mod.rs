//! Port contracts for the board's external collaborators.

mod confirmation;
mod notification;
mod persistence;

#[cfg(test)]
pub use confirmation::MockConfirmationApi;
pub use confirmation::{ConfirmationApi, ConfirmationError, ConfirmationResult};
pub use notification::{NotificationSink, Severity};
pub use persistence::{KeyValueError, KeyValueResult, KeyValueStore};
