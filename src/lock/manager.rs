use std::sync::Arc;

use super::{Lock, LockError};

/// Factory trait for obtaining per-aggregate locks.
///
/// The event store uses a `LockManager` to serialize writers to the same
/// aggregate while letting writers to different aggregates proceed in parallel.
/// The default `InMemoryLockManager` stores locks in a `HashMap`; distributed
/// implementations might talk to Redis, Postgres, etc.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or lazily create) the lock for the given aggregate id.
    ///
    /// Repeated calls with the same `id` must return the same logical lock
    /// (i.e. the same `Arc` for in-memory, or the same distributed key).
    fn get_lock(&self, id: &str) -> Result<Arc<Self::Lock>, LockError>;
}
