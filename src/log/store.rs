use crate::error::StoreError;
use crate::event::EventRecord;

/// Trait for event-log persistence: append-only, per-aggregate ordered streams
/// plus the authoritative current-version counter.
///
/// Versions are assigned by the `EventStore` façade before `append` is called;
/// implementations store records verbatim and advance the version counter to the
/// batch's last event in the same write. Durable backings (file, database)
/// implement this trait behind the same read/append interface.
pub trait EventLog: Send + Sync {
    /// Append a pre-versioned batch to the aggregate's stream and advance the
    /// version counter. Returns the new current version.
    fn append(&self, aggregate_id: &str, events: Vec<EventRecord>) -> Result<u64, StoreError>;

    /// Committed events with `version > from_version` and, when bounded,
    /// `version <= to_version`, ascending. Returns owned copies; never blocks
    /// on the append path's write lock.
    fn events(
        &self,
        aggregate_id: &str,
        from_version: u64,
        to_version: Option<u64>,
    ) -> Result<Vec<EventRecord>, StoreError>;

    /// Current committed version for the aggregate (0 means "no events").
    fn current_version(&self, aggregate_id: &str) -> Result<u64, StoreError>;

    /// Whether the aggregate has any committed events.
    fn has_events(&self, aggregate_id: &str) -> Result<bool, StoreError>;

    /// Replace the aggregate's stream wholesale (import support), recomputing
    /// the version counter from the last record. Returns the new current version.
    fn replace(&self, aggregate_id: &str, events: Vec<EventRecord>) -> Result<u64, StoreError>;

    /// Administrative: remove the aggregate's stream and version tracking.
    /// Returns true if any events existed.
    fn clear(&self, aggregate_id: &str) -> Result<bool, StoreError>;
}
