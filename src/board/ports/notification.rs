//! Notification port for user-visible messages.

use std::time::Duration;

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Operation completed.
    Success,
    /// Operation failed and was rolled back.
    Error,
    /// Informational update.
    Info,
    /// Something needed attention, such as a conflict merge.
    Warning,
}

impl Severity {
    /// Returns a short label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// Sink for user-visible notifications.
///
/// The core raises exactly one notification per confirmation failure and
/// per conflict resolution, and none otherwise. Delivery is fire and
/// forget.
pub trait NotificationSink: Send + Sync {
    /// Publishes a notification, optionally bounded to a display duration.
    fn notify(&self, severity: Severity, message: &str, duration: Option<Duration>);
}
