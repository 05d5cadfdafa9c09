//! In-memory key-value store for board persistence.

use crate::board::ports::{KeyValueResult, KeyValueStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Thread-safe in-memory JSON key-value store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    state: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().len()
    }

    /// Returns `true` when no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> KeyValueResult<Option<serde_json::Value>> {
        Ok(self.state.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> KeyValueResult<()> {
        self.state.write().insert(key.to_owned(), value);
        Ok(())
    }
}
