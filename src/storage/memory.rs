//! In-memory key-value storage for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{FarsightError, Result};
use crate::storage::KvStore;

/// In-memory key-value store.
///
/// Values are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> FarsightError {
    FarsightError::invalid_state("memory store lock poisoned")
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_kv_store_roundtrip;
    use std::sync::Arc;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryKvStore::new();
        test_kv_store_roundtrip(&store);
    }

    #[test]
    fn test_len_and_is_empty() {
        let store = MemoryKvStore::default();
        assert!(store.is_empty());

        store.put("a", "1").unwrap();
        store.put("b", "2").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_arc_shares_entries() {
        let store = Arc::new(MemoryKvStore::new());
        let other = Arc::clone(&store);

        store.put("key", "value").unwrap();
        assert_eq!(other.get("key").unwrap().as_deref(), Some("value"));
    }
}
