mod error;
mod in_memory;
mod lock;
mod manager;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::{Lock, LockGuard};
pub use manager::LockManager;
