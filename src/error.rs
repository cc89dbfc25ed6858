use std::fmt;

use crate::lock::LockError;

/// Error type for all store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Caller supplied a malformed event or batch. Raised before any mutation.
    InvalidEvent(String),
    /// Event payload exceeds the configured size ceiling.
    PayloadTooLarge { size: usize, limit: usize },
    /// Optimistic-lock failure: the aggregate moved past `expected`.
    /// Retryable — re-read the current version and reapply domain logic.
    ConcurrencyConflict {
        aggregate_id: String,
        expected: u64,
        actual: u64,
    },
    /// No snapshot and no events exist for the aggregate.
    AggregateNotFound(String),
    /// Replayed events do not form a contiguous version sequence.
    /// Indicates log corruption; replay aborts without returning state.
    VersionContinuity {
        aggregate_id: String,
        expected: u64,
        found: u64,
    },
    /// Snapshot version exceeds the aggregate's current committed version.
    InvalidSnapshot {
        aggregate_id: String,
        version: u64,
        current: u64,
    },
    /// Payload or state blob could not be encoded/decoded.
    Serialization(String),
    /// The store-internal lock primitive was poisoned.
    LockPoisoned(&'static str),
    /// Per-aggregate lock error.
    Lock(LockError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidEvent(message) => write!(f, "invalid event: {}", message),
            StoreError::PayloadTooLarge { size, limit } => write!(
                f,
                "payload too large: {} bytes exceeds limit of {} bytes",
                size, limit
            ),
            StoreError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual,
            } => write!(
                f,
                "concurrent write detected for aggregate {} (expected version {}, got {})",
                aggregate_id, expected, actual
            ),
            StoreError::AggregateNotFound(aggregate_id) => {
                write!(f, "aggregate {} not found", aggregate_id)
            }
            StoreError::VersionContinuity {
                aggregate_id,
                expected,
                found,
            } => write!(
                f,
                "version continuity broken for aggregate {} (expected version {}, found {})",
                aggregate_id, expected, found
            ),
            StoreError::InvalidSnapshot {
                aggregate_id,
                version,
                current,
            } => write!(
                f,
                "invalid snapshot for aggregate {}: version {} exceeds current version {}",
                aggregate_id, version, current
            ),
            StoreError::Serialization(message) => write!(f, "serialization error: {}", message),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Lock(err) => write!(f, "lock error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<LockError> for StoreError {
    fn from(err: LockError) -> Self {
        StoreError::Lock(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
