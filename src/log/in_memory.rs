use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::event::EventRecord;

use super::store::EventLog;

#[derive(Default)]
struct Streams {
    events: HashMap<String, Vec<EventRecord>>,
    versions: HashMap<String, u64>,
}

/// In-memory event log backed by `Arc<RwLock<HashMap>>`.
///
/// Streams and the per-aggregate version counters live behind the same lock so
/// the counter is updated in the same write as the batch's last event.
/// Clone-friendly (cloning shares the same underlying storage). Readers get
/// owned copies of a consistent view; they never observe a torn append.
#[derive(Clone)]
pub struct InMemoryEventLog {
    inner: Arc<RwLock<Streams>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        InMemoryEventLog {
            inner: Arc::new(RwLock::new(Streams::default())),
        }
    }
}

impl Default for InMemoryEventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog for InMemoryEventLog {
    fn append(&self, aggregate_id: &str, events: Vec<EventRecord>) -> Result<u64, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("event log write"))?;

        let Some(last_version) = events.last().map(|e| e.version) else {
            return Ok(inner.versions.get(aggregate_id).copied().unwrap_or(0));
        };

        inner
            .events
            .entry(aggregate_id.to_string())
            .or_default()
            .extend(events);
        inner.versions.insert(aggregate_id.to_string(), last_version);

        Ok(last_version)
    }

    fn events(
        &self,
        aggregate_id: &str,
        from_version: u64,
        to_version: Option<u64>,
    ) -> Result<Vec<EventRecord>, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("event log read"))?;

        let Some(stream) = inner.events.get(aggregate_id) else {
            return Ok(Vec::new());
        };

        Ok(stream
            .iter()
            .filter(|e| {
                e.version > from_version && to_version.map_or(true, |to| e.version <= to)
            })
            .cloned()
            .collect())
    }

    fn current_version(&self, aggregate_id: &str) -> Result<u64, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("event log read"))?;
        Ok(inner.versions.get(aggregate_id).copied().unwrap_or(0))
    }

    fn has_events(&self, aggregate_id: &str) -> Result<bool, StoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("event log read"))?;
        Ok(inner
            .events
            .get(aggregate_id)
            .map(|stream| !stream.is_empty())
            .unwrap_or(false))
    }

    fn replace(&self, aggregate_id: &str, events: Vec<EventRecord>) -> Result<u64, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("event log write"))?;

        match events.last().map(|e| e.version) {
            Some(last_version) => {
                inner.events.insert(aggregate_id.to_string(), events);
                inner.versions.insert(aggregate_id.to_string(), last_version);
                Ok(last_version)
            }
            None => {
                inner.events.remove(aggregate_id);
                inner.versions.remove(aggregate_id);
                Ok(0)
            }
        }
    }

    fn clear(&self, aggregate_id: &str) -> Result<bool, StoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("event log write"))?;
        inner.versions.remove(aggregate_id);
        Ok(inner.events.remove(aggregate_id).is_some())
    }
}
