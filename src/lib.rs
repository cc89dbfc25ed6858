mod error;
mod event;
mod export;
mod lock;
mod log;
mod reducer;
mod rehydrate;
mod snapshot;
mod store;

pub use error::StoreError;
pub use event::{Commit, EventRecord, NewEvent};
pub use export::ExportBundle;
pub use lock::{InMemoryLock, InMemoryLockManager, Lock, LockError, LockGuard, LockManager};
pub use log::{EventLog, InMemoryEventLog};
pub use reducer::{ErasedReducer, Reducer, SerdeReducer};
pub use rehydrate::{rebuild, Rehydrated};
pub use snapshot::{InMemorySnapshotStore, SnapshotRecord, SnapshotStore};
pub use store::{EventStore, StoreConfig};
