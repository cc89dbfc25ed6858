use std::collections::HashMap;
use std::time::SystemTime;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// A committed, immutable event: one versioned fact in an aggregate's history.
///
/// Records are created exclusively by the store during `append_events` and never
/// mutated afterwards. The payload is an opaque bitcode blob; it serializes to
/// JSON as a base64 string.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EventRecord {
    pub event_id: Uuid,
    pub aggregate_id: String,
    pub event_type: String,
    #[serde(with = "payload_serde")]
    pub payload: Vec<u8>,
    pub version: u64,
    pub timestamp: SystemTime,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

mod payload_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(payload).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl EventRecord {
    /// Deserialize the payload into the specified type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        bitcode::deserialize(&self.payload).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Get the raw payload bytes.
    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Get a metadata value by key.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }
}

/// An event handed to `append_events`, not yet committed.
///
/// The version, timestamp, and (unless pre-set) identifier are assigned by the
/// store when the batch commits. A declared `aggregate_id` is optional; when
/// present it must match the append target.
#[derive(Clone, Debug)]
pub struct NewEvent {
    pub event_id: Option<Uuid>,
    pub aggregate_id: Option<String>,
    pub event_type: String,
    pub payload: Vec<u8>,
    pub metadata: HashMap<String, String>,
}

impl NewEvent {
    pub fn new(event_type: impl Into<String>, payload: Vec<u8>) -> Self {
        NewEvent {
            event_id: None,
            aggregate_id: None,
            event_type: event_type.into(),
            payload,
            metadata: HashMap::new(),
        }
    }

    /// Create an event with a bitcode-serialized payload.
    /// A payload that cannot be serialized fails here, before any store call.
    pub fn encode<T: Serialize>(
        event_type: impl Into<String>,
        payload: &T,
    ) -> Result<Self, StoreError> {
        let bytes =
            bitcode::serialize(payload).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(NewEvent::new(event_type, bytes))
    }

    pub fn with_id(mut self, event_id: Uuid) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn for_aggregate(mut self, aggregate_id: impl Into<String>) -> Self {
        self.aggregate_id = Some(aggregate_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Assign the fields only the store may set, producing a committed record.
    pub(crate) fn seal(self, aggregate_id: &str, version: u64) -> EventRecord {
        EventRecord {
            event_id: self.event_id.unwrap_or_else(Uuid::new_v4),
            aggregate_id: aggregate_id.to_string(),
            event_type: self.event_type,
            payload: self.payload,
            version,
            timestamp: SystemTime::now(),
            metadata: self.metadata,
        }
    }
}

/// Result of a successful `append_events` call.
#[derive(Clone, Debug)]
pub struct Commit {
    pub aggregate_id: String,
    pub events: Vec<EventRecord>,
    pub current_version: u64,
}
