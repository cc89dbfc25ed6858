use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// A stored snapshot: materialized aggregate state at a given version, used to
/// bound replay cost. Never mutated once created. The state blob serializes to
/// JSON as a base64 string.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SnapshotRecord {
    pub snapshot_id: Uuid,
    pub aggregate_id: String,
    pub version: u64,
    #[serde(with = "state_serde")]
    pub state: Vec<u8>,
    pub created_at: SystemTime,
}

mod state_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(state: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(state).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl SnapshotRecord {
    pub fn new(aggregate_id: impl Into<String>, version: u64, state: Vec<u8>) -> Self {
        SnapshotRecord {
            snapshot_id: Uuid::new_v4(),
            aggregate_id: aggregate_id.into(),
            version,
            state,
            created_at: SystemTime::now(),
        }
    }

    /// Get the raw state bytes.
    pub fn state_bytes(&self) -> &[u8] {
        &self.state
    }
}

/// Trait for snapshot persistence. One snapshot per aggregate id (latest wins).
pub trait SnapshotStore: Send + Sync {
    /// Load the latest snapshot for the given aggregate id, as an owned copy.
    fn get_snapshot(&self, id: &str) -> Result<Option<SnapshotRecord>, StoreError>;

    /// Save the snapshot for the given aggregate id, superseding any prior one.
    fn save_snapshot(&self, record: SnapshotRecord) -> Result<(), StoreError>;

    /// Delete the snapshot for the given aggregate id. Returns true if one existed.
    fn delete_snapshot(&self, id: &str) -> Result<bool, StoreError>;
}
