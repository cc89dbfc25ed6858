use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::event::{Commit, EventRecord, NewEvent};
use crate::export::ExportBundle;
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};
use crate::log::{EventLog, InMemoryEventLog};
use crate::reducer::{ErasedReducer, Reducer};
use crate::rehydrate::{check_continuity, rebuild, Rehydrated};
use crate::snapshot::{InMemorySnapshotStore, SnapshotRecord, SnapshotStore};

use super::config::StoreConfig;

/// Event store façade: append/read/rebuild/snapshot over an event log, a
/// snapshot store, and a per-aggregate lock manager.
///
/// Writers to the same aggregate serialize through the lock manager; writers to
/// different aggregates proceed in parallel. Reads never take the write lock.
/// The automatic-snapshot policy runs strictly after the append's critical
/// section has released the lock, and its failures are logged, never surfaced
/// to the appending caller.
pub struct EventStore<L, S, M = InMemoryLockManager> {
    log: L,
    snapshots: S,
    locks: M,
    reducers: RwLock<HashMap<String, Arc<dyn ErasedReducer>>>,
    config: StoreConfig,
}

impl EventStore<InMemoryEventLog, InMemorySnapshotStore> {
    /// Fully in-memory store with default configuration.
    pub fn in_memory() -> Self {
        Self::in_memory_with(StoreConfig::default())
    }

    pub fn in_memory_with(config: StoreConfig) -> Self {
        EventStore::new(
            InMemoryEventLog::new(),
            InMemorySnapshotStore::new(),
            InMemoryLockManager::new(),
            config,
        )
    }
}

impl<L, S, M> EventStore<L, S, M>
where
    L: EventLog,
    S: SnapshotStore,
    M: LockManager,
{
    pub fn new(log: L, snapshots: S, locks: M, config: StoreConfig) -> Self {
        EventStore {
            log,
            snapshots,
            locks,
            reducers: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Access the underlying event log.
    pub fn log(&self) -> &L {
        &self.log
    }

    /// Access the underlying snapshot store.
    pub fn snapshots(&self) -> &S {
        &self.snapshots
    }

    /// Append a batch of events with optimistic concurrency control.
    ///
    /// Validates the batch before taking any lock; inside the aggregate's
    /// critical section, compares `expected_version` against the committed
    /// version and fails with `ConcurrencyConflict` on mismatch — no partial
    /// write occurs. On success the batch is assigned versions
    /// `expected_version+1..=expected_version+n` in order.
    pub fn append_events(
        &self,
        aggregate_id: &str,
        events: Vec<NewEvent>,
        expected_version: u64,
    ) -> Result<Commit, StoreError> {
        self.validate_batch(aggregate_id, &events)?;

        let lock = self.locks.get_lock(aggregate_id)?;
        let commit = {
            let _guard = LockGuard::acquire(lock.as_ref())?;

            let actual = self.log.current_version(aggregate_id)?;
            if actual != expected_version {
                return Err(StoreError::ConcurrencyConflict {
                    aggregate_id: aggregate_id.to_string(),
                    expected: expected_version,
                    actual,
                });
            }

            let records: Vec<EventRecord> = events
                .into_iter()
                .enumerate()
                .map(|(offset, event)| {
                    event.seal(aggregate_id, expected_version + 1 + offset as u64)
                })
                .collect();

            let current_version = self.log.append(aggregate_id, records.clone())?;
            Commit {
                aggregate_id: aggregate_id.to_string(),
                events: records,
                current_version,
            }
        };

        // Best-effort, outside the critical section: snapshotting is a
        // performance optimization, not a correctness requirement.
        if let Err(err) = self.run_snapshot_policy(aggregate_id) {
            warn!(aggregate_id, error = %err, "automatic snapshot failed");
        }

        Ok(commit)
    }

    /// Committed events with `version > from_version` and, when bounded,
    /// `version <= to_version`, ascending. Read-only; does not take the write lock.
    pub fn get_events(
        &self,
        aggregate_id: &str,
        from_version: u64,
        to_version: Option<u64>,
    ) -> Result<Vec<EventRecord>, StoreError> {
        self.log.events(aggregate_id, from_version, to_version)
    }

    /// Current committed version (0 if the aggregate has no events).
    pub fn get_current_version(&self, aggregate_id: &str) -> Result<u64, StoreError> {
        self.log.current_version(aggregate_id)
    }

    /// Whether the aggregate is known to the store: any events or a snapshot.
    pub fn exists(&self, aggregate_id: &str) -> Result<bool, StoreError> {
        Ok(self.log.has_events(aggregate_id)?
            || self.snapshots.get_snapshot(aggregate_id)?.is_some())
    }

    /// Store a caller-materialized snapshot. The state is deep-copied, so the
    /// stored record is immune to later caller-side mutation.
    pub fn create_snapshot(
        &self,
        aggregate_id: &str,
        version: u64,
        state: &[u8],
    ) -> Result<SnapshotRecord, StoreError> {
        let current = self.log.current_version(aggregate_id)?;
        if version > current {
            return Err(StoreError::InvalidSnapshot {
                aggregate_id: aggregate_id.to_string(),
                version,
                current,
            });
        }

        let record = SnapshotRecord::new(aggregate_id, version, state.to_vec());
        self.snapshots.save_snapshot(record.clone())?;
        Ok(record)
    }

    /// Latest snapshot for the aggregate, as an owned defensive copy.
    pub fn get_snapshot(&self, aggregate_id: &str) -> Result<Option<SnapshotRecord>, StoreError> {
        self.snapshots.get_snapshot(aggregate_id)
    }

    /// Register the reducer the automatic-snapshot policy uses for this
    /// aggregate. Without a registered reducer the policy is skipped.
    pub fn register_reducer(
        &self,
        aggregate_id: impl Into<String>,
        reducer: Arc<dyn ErasedReducer>,
    ) -> Result<(), StoreError> {
        let mut reducers = self
            .reducers
            .write()
            .map_err(|_| StoreError::LockPoisoned("reducer registry write"))?;
        reducers.insert(aggregate_id.into(), reducer);
        Ok(())
    }

    /// Reconstruct current aggregate state via snapshot + replay.
    pub fn rebuild<R: Reducer>(
        &self,
        aggregate_id: &str,
        reducer: &R,
    ) -> Result<Rehydrated<R::State>, StoreError> {
        rebuild(&self.log, &self.snapshots, aggregate_id, reducer)
    }

    /// Administrative: remove the aggregate's events, version tracking, and
    /// snapshot. Returns true if anything existed.
    pub fn clear_aggregate(&self, aggregate_id: &str) -> Result<bool, StoreError> {
        let lock = self.locks.get_lock(aggregate_id)?;
        let _guard = LockGuard::acquire(lock.as_ref())?;

        let had_events = self.log.clear(aggregate_id)?;
        let had_snapshot = self.snapshots.delete_snapshot(aggregate_id)?;
        Ok(had_events || had_snapshot)
    }

    /// Serialize the aggregate's full event list (plus the current snapshot,
    /// when one exists) to a transportable bundle.
    pub fn export_aggregate(&self, aggregate_id: &str) -> Result<ExportBundle, StoreError> {
        let events = self.log.events(aggregate_id, 0, None)?;
        let snapshot = self.snapshots.get_snapshot(aggregate_id)?;
        if events.is_empty() && snapshot.is_none() {
            return Err(StoreError::AggregateNotFound(aggregate_id.to_string()));
        }
        Ok(ExportBundle {
            aggregate_id: aggregate_id.to_string(),
            events,
            snapshot,
        })
    }

    /// Reload a previously exported bundle, replacing the aggregate's stream.
    /// Re-validates aggregate ids and version continuity from 1, and recomputes
    /// `current_version` as the maximum imported version.
    pub fn import_aggregate(&self, bundle: ExportBundle) -> Result<u64, StoreError> {
        for event in &bundle.events {
            if event.event_type.is_empty() {
                return Err(StoreError::InvalidEvent("empty event type".into()));
            }
            if event.aggregate_id != bundle.aggregate_id {
                return Err(StoreError::InvalidEvent(format!(
                    "event {} belongs to aggregate {}, not {}",
                    event.event_id, event.aggregate_id, bundle.aggregate_id
                )));
            }
        }
        check_continuity(&bundle.aggregate_id, 0, &bundle.events)?;

        let max_version = bundle.events.last().map(|e| e.version).unwrap_or(0);
        if let Some(snapshot) = &bundle.snapshot {
            if snapshot.aggregate_id != bundle.aggregate_id {
                return Err(StoreError::InvalidEvent(format!(
                    "snapshot belongs to aggregate {}, not {}",
                    snapshot.aggregate_id, bundle.aggregate_id
                )));
            }
            if snapshot.version > max_version {
                return Err(StoreError::InvalidSnapshot {
                    aggregate_id: bundle.aggregate_id.clone(),
                    version: snapshot.version,
                    current: max_version,
                });
            }
        }

        let lock = self.locks.get_lock(&bundle.aggregate_id)?;
        let _guard = LockGuard::acquire(lock.as_ref())?;

        let current = self.log.replace(&bundle.aggregate_id, bundle.events)?;
        match bundle.snapshot {
            Some(snapshot) => self.snapshots.save_snapshot(snapshot)?,
            None => {
                self.snapshots.delete_snapshot(&bundle.aggregate_id)?;
            }
        }
        Ok(current)
    }

    fn validate_batch(&self, aggregate_id: &str, events: &[NewEvent]) -> Result<(), StoreError> {
        if events.is_empty() {
            return Err(StoreError::InvalidEvent("empty batch".into()));
        }
        let limit = self.config.max_payload_bytes();
        for event in events {
            if event.event_type.is_empty() {
                return Err(StoreError::InvalidEvent("empty event type".into()));
            }
            if let Some(declared) = &event.aggregate_id {
                if declared != aggregate_id {
                    return Err(StoreError::InvalidEvent(format!(
                        "event declares aggregate {}, append targets {}",
                        declared, aggregate_id
                    )));
                }
            }
            if event.payload.len() > limit {
                return Err(StoreError::PayloadTooLarge {
                    size: event.payload.len(),
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Evaluate the automatic-snapshot policy for one aggregate. Runs with the
    /// aggregate's write lock already released; must not re-enter it.
    fn run_snapshot_policy(&self, aggregate_id: &str) -> Result<(), StoreError> {
        let reducer = {
            let reducers = self
                .reducers
                .read()
                .map_err(|_| StoreError::LockPoisoned("reducer registry read"))?;
            reducers.get(aggregate_id).cloned()
        };
        let Some(reducer) = reducer else {
            debug!(aggregate_id, "no reducer registered, skipping snapshot policy");
            return Ok(());
        };

        let current = self.log.current_version(aggregate_id)?;
        let snapshot = self.snapshots.get_snapshot(aggregate_id)?;
        let baseline = snapshot.as_ref().map(|s| s.version).unwrap_or(0);
        if current.saturating_sub(baseline) < self.config.snapshot_frequency() {
            return Ok(());
        }

        let events = self.log.events(aggregate_id, baseline, None)?;
        check_continuity(aggregate_id, baseline, &events)?;
        let Some(version) = events.last().map(|e| e.version) else {
            return Ok(());
        };

        let base = snapshot.as_ref().map(|s| s.state.as_slice());
        let state = reducer.fold_blob(base, &events)?;
        self.snapshots
            .save_snapshot(SnapshotRecord::new(aggregate_id, version, state))?;
        debug!(aggregate_id, version, "automatic snapshot stored");
        Ok(())
    }
}
