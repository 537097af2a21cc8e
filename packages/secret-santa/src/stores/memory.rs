//! In-memory local storage for testing and ephemeral sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::traits::store::{LocalBackend, StoreResult};
use crate::types::event::Event;

/// Local backend holding serialized events in a map.
///
/// Entries are kept as JSON text, the same shape a browser's key-value
/// storage would hold, so reads exercise deserialization.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw stored record for a key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl LocalBackend for MemoryStore {
    async fn read(&self, key: &str) -> StoreResult<Option<Event>> {
        match self.raw(key) {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, event: &Event) -> StoreResult<()> {
        let json = serde_json::to_string(event)?;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), json);
        Ok(())
    }
}
