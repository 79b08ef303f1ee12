//! Recent-query history: most-recent-first, case-insensitively distinct,
//! capped, and written through to a `KeyValueStore` on every mutation.
//!
//! The list lives behind a single mutex that is held across both the
//! in-memory change and the store write, so concurrent writers can't
//! interleave and lose entries. If the write fails the in-memory list keeps
//! the change and the error is returned for the caller to surface.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::SearchConfig;
use crate::interface::{KeyValueStore, StoreError, TickrError};

fn same_query(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

pub struct QueryHistory {
    entries: Mutex<Vec<String>>,
    store: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
}

impl std::fmt::Debug for QueryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryHistory")
            .field("entries", &*self.entries.lock())
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl QueryHistory {
    /// Load the persisted list. A missing, unreadable or corrupt value starts
    /// an empty history rather than failing startup.
    pub fn load(store: Arc<dyn KeyValueStore>, config: &SearchConfig) -> Self {
        let capacity = config.capacity();
        let key = config.history_key.clone();

        let entries = match store.get(key.clone()) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<String>>(&json) {
                Ok(stored) => sanitize(stored, capacity),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding unparsable query history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "failed to read query history");
                Vec::new()
            }
        };

        Self {
            entries: Mutex::new(entries),
            store,
            key,
            capacity,
        }
    }

    /// Move `query` to the front, inserting it if new. Blank queries are ignored.
    pub fn record(&self, query: &str) -> Result<(), TickrError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        let mut entries = self.entries.lock();
        if let Some(pos) = entries.iter().position(|e| same_query(e, trimmed)) {
            entries.remove(pos);
        }
        entries.insert(0, trimmed.to_string());
        entries.truncate(self.capacity);
        self.persist(&entries)
    }

    /// Remove the first entry matching `query` case-insensitively.
    pub fn remove(&self, query: &str) -> Result<(), TickrError> {
        let trimmed = query.trim();
        let mut entries = self.entries.lock();
        match entries.iter().position(|e| same_query(e, trimmed)) {
            Some(pos) => {
                entries.remove(pos);
                self.persist(&entries)
            }
            None => Ok(()),
        }
    }

    pub fn clear(&self) -> Result<(), TickrError> {
        let mut entries = self.entries.lock();
        entries.clear();
        self.persist(&entries)
    }

    /// Snapshot, most recent first.
    pub fn all(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn persist(&self, entries: &[String]) -> Result<(), TickrError> {
        let json = serde_json::to_string(entries)?;
        self.store.set(self.key.clone(), json)?;
        Ok(())
    }
}

/// Trim, drop blanks and case-insensitive repeats (first wins), cap.
fn sanitize(stored: Vec<String>, capacity: usize) -> Vec<String> {
    let mut entries: Vec<String> = Vec::with_capacity(capacity.min(stored.len()));
    for entry in stored {
        let trimmed = entry.trim();
        if trimmed.is_empty() || entries.iter().any(|e| same_query(e, trimmed)) {
            continue;
        }
        entries.push(trimmed.to_string());
        if entries.len() == capacity {
            break;
        }
    }
    entries
}

/// Process-local `KeyValueStore`, for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: String) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().get(&key).cloned())
    }

    fn set(&self, key: String, value: String) -> Result<(), StoreError> {
        self.values.write().insert(key, value);
        Ok(())
    }
}
