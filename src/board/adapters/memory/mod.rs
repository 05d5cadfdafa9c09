//! In-process adapters backing the board's ports.

mod confirmation;
mod notification;
mod persistence;

pub use confirmation::SimulatedConfirmationApi;
pub use notification::{Notification, RecordingNotificationSink, TracingNotificationSink};
pub use persistence::InMemoryKeyValueStore;
