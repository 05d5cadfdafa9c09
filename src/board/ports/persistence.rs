//! Key-value persistence port for board snapshots.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for key-value store operations.
pub type KeyValueResult<T> = Result<T, KeyValueError>;

/// JSON key-value persistence contract.
///
/// The currency is `serde_json::Value`, so timestamps round-trip as
/// ISO-8601 strings; the domain types are responsible for parsing them
/// back into comparable date values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::Storage`] when the backing store fails.
    async fn get(&self, key: &str) -> KeyValueResult<Option<serde_json::Value>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueError::Storage`] when the backing store fails.
    async fn set(&self, key: &str, value: serde_json::Value) -> KeyValueResult<()>;
}

/// Errors returned by key-value store implementations.
#[derive(Debug, Clone, Error)]
pub enum KeyValueError {
    /// Backing-store failure.
    #[error("storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl KeyValueError {
    /// Wraps a backing-store error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
