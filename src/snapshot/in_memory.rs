use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;

use super::store::{SnapshotRecord, SnapshotStore};

/// In-memory snapshot store backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly (cloning shares the same underlying storage). Returned
/// records are owned copies, so callers cannot mutate stored state.
#[derive(Clone)]
pub struct InMemorySnapshotStore {
    storage: Arc<RwLock<HashMap<String, SnapshotRecord>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn get_snapshot(&self, id: &str) -> Result<Option<SnapshotRecord>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("snapshot read"))?;
        Ok(storage.get(id).cloned())
    }

    fn save_snapshot(&self, record: SnapshotRecord) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("snapshot write"))?;
        storage.insert(record.aggregate_id.clone(), record);
        Ok(())
    }

    fn delete_snapshot(&self, id: &str) -> Result<bool, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("snapshot write"))?;
        Ok(storage.remove(id).is_some())
    }
}
