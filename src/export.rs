use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::event::EventRecord;
use crate::snapshot::SnapshotRecord;

/// Transportable form of one aggregate's history: the full event list, plus
/// the current snapshot when one exists. Produced by `export_aggregate` and
/// consumed by `import_aggregate`, which re-validates continuity and recomputes
/// the current version from the imported events.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ExportBundle {
    pub aggregate_id: String,
    pub events: Vec<EventRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotRecord>,
}

impl ExportBundle {
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
