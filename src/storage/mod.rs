pub mod json_backend;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::{StoreError, StoreResult};

/// Current snapshot schema. Bump when the envelope layout changes.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Abstraction over persistence backends addressed by namespace, in the
/// manner of a browser-local key-value store.
pub trait StorageBackend: Send + Sync {
    fn write(&self, namespace: &str, data: &str) -> StoreResult<()>;
    fn read(&self, namespace: &str) -> StoreResult<Option<String>>;
    fn remove(&self, namespace: &str) -> StoreResult<()>;
    fn exists(&self, namespace: &str) -> StoreResult<bool>;
}

/// Envelope wrapped around every persisted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub data: T,
}

/// Serializes `data` into a versioned snapshot and hands it to the backend.
pub fn save_snapshot<T: Serialize>(
    backend: &dyn StorageBackend,
    namespace: &str,
    data: &T,
) -> StoreResult<()> {
    let snapshot = Snapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        saved_at: Utc::now(),
        data,
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    backend.write(namespace, &json)
}

/// Loads and unwraps a snapshot, returning `None` when the namespace has
/// never been written. Snapshots saved by a newer schema are refused.
pub fn load_snapshot<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    namespace: &str,
) -> StoreResult<Option<T>> {
    let raw = match backend.read(namespace)? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let snapshot: Snapshot<T> = serde_json::from_str(&raw)?;
    if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
        return Err(StoreError::Storage(format!(
            "namespace `{}` was saved by a newer schema version ({} > {})",
            namespace, snapshot.schema_version, SNAPSHOT_SCHEMA_VERSION
        )));
    }
    Ok(Some(snapshot.data))
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
