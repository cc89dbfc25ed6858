use super::LockError;

/// Trait for a single mutual-exclusion lock.
///
/// Implementations provide blocking lock, non-blocking try-lock, and unlock.
/// The in-memory lock uses `Mutex` + `Condvar`; durable deployments might use
/// database advisory locks or lease-based primitives behind the same trait.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    /// There is no built-in acquisition timeout; callers impose deadlines externally.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}

/// RAII guard: releases the lock when dropped, on success and error paths alike.
pub struct LockGuard<'a, L: Lock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: Lock + ?Sized> LockGuard<'a, L> {
    /// Block until the lock is acquired, then return a guard holding it.
    pub fn acquire(lock: &'a L) -> Result<Self, LockError> {
        lock.lock()?;
        Ok(LockGuard { lock })
    }
}

impl<L: Lock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        // An unlock failure means the lock primitive itself is poisoned;
        // nothing useful can be done from a destructor.
        let _ = self.lock.unlock();
    }
}
