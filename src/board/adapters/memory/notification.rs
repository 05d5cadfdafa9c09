//! In-process notification sinks.

use crate::board::ports::{NotificationSink, Severity};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A captured notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity the core raised the notification with.
    pub severity: Severity,
    /// User-visible message.
    pub message: String,
    /// Requested display duration, if any.
    pub duration: Option<Duration>,
}

/// Sink that records every notification for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationSink {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotificationSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every notification raised so far.
    #[must_use]
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().clone()
    }

    /// Removes and returns every notification raised so far.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl NotificationSink for RecordingNotificationSink {
    fn notify(&self, severity: Severity, message: &str, duration: Option<Duration>) {
        self.events.lock().push(Notification {
            severity,
            message: message.to_owned(),
            duration,
        });
    }
}

/// Sink that forwards notifications to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, severity: Severity, message: &str, _duration: Option<Duration>) {
        match severity {
            Severity::Success | Severity::Info => {
                tracing::info!(severity = severity.as_str(), "{message}");
            }
            Severity::Warning => tracing::warn!(severity = severity.as_str(), "{message}"),
            Severity::Error => tracing::error!(severity = severity.as_str(), "{message}"),
        }
    }
}
