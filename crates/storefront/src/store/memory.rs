//! In-memory store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::error::StoreError;

/// Key-value store backed by a shared in-process map.
///
/// Clones share the same map, so a second service built from a clone sees
/// what the first one wrote (which is how tests simulate a process restart).
/// Reads and writes can be made to fail independently.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose reads and writes all fail.
    #[must_use]
    pub fn failing() -> Self {
        let store = Self::new();
        store.set_fail_reads(true);
        store.set_fail_writes(true);
        store
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes and removals fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Read a value, ignoring failure injection.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.inner.entries.lock().await.get(key).cloned()
    }

    /// Number of stored keys, ignoring failure injection.
    pub async fn len(&self) -> usize {
        self.inner.entries.lock().await.len()
    }

    /// Whether the store holds no keys, ignoring failure injection.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{op} disabled")));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::check(&self.inner.fail_reads, "reads")?;
        Ok(self.inner.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::check(&self.inner.fail_writes, "writes")?;
        self.inner
            .entries
            .lock()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        Self::check(&self.inner.fail_writes, "writes")?;
        self.inner.entries.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("k", "v").await.unwrap();
        assert_eq!(other.peek("k").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.set("k", "v").await.unwrap();

        store.set_fail_reads(true);
        assert!(matches!(store.get("k").await, Err(StoreError::Unavailable(_))));
        assert!(store.set("k", "w").await.is_ok());

        store.set_fail_writes(true);
        assert!(store.set("k", "x").await.is_err());
        assert!(store.remove("k").await.is_err());
        assert_eq!(store.peek("k").await.as_deref(), Some("w"));
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryStore::failing();
        assert!(store.get("k").await.is_err());
        assert!(store.set("k", "v").await.is_err());
    }
}
