//! In-memory credential store backed by a `HashMap` behind a `Mutex`.

use async_trait::async_trait;
use pitchside_types::{ClientError, CredentialStore, traits::Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// An in-memory [`CredentialStore`] implementation for testing and ephemeral use.
pub struct InMemoryCredentialStore {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(key.into(), value.into());
        Self {
            data: Mutex::new(map),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| ClientError::Storage("credential map lock poisoned".into()))
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryCredentialStore::new();
        store.set("token", "abc").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryCredentialStore::new();
        assert!(store.get("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryCredentialStore::with_entry("token", "abc");
        store.remove("token").await.unwrap();
        assert!(store.get("token").await.unwrap().is_none());
        // Removing again is fine.
        store.remove("token").await.unwrap();
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = InMemoryCredentialStore::new();
        store.set("token", "first").await.unwrap();
        store.set("token", "second").await.unwrap();
        assert_eq!(store.get("token").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryCredentialStore::new();
        store.set("token", "tok").await.unwrap();
        store.set("registration", "{}").await.unwrap();
        store.remove("token").await.unwrap();
        assert_eq!(
            store.get("registration").await.unwrap().as_deref(),
            Some("{}")
        );
    }
}
