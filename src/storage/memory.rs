use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use crate::errors::{StoreError, StoreResult};

use super::StorageBackend;

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> StoreResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Storage("memory backend lock poisoned".into()))
    }
}

impl StorageBackend for MemoryStorage {
    fn write(&self, namespace: &str, data: &str) -> StoreResult<()> {
        self.entries()?
            .insert(namespace.to_string(), data.to_string());
        Ok(())
    }

    fn read(&self, namespace: &str) -> StoreResult<Option<String>> {
        Ok(self.entries()?.get(namespace).cloned())
    }

    fn remove(&self, namespace: &str) -> StoreResult<()> {
        self.entries()?.remove(namespace);
        Ok(())
    }

    fn exists(&self, namespace: &str) -> StoreResult<bool> {
        Ok(self.entries()?.contains_key(namespace))
    }
}
