use serde::{Deserialize, Serialize};
use versioned_store::{EventRecord, NewEvent, SerdeReducer};

/// Minimal domain aggregate for export tests: a running tally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub total: i64,
    pub entries: u64,
}

pub fn apply(mut state: Tally, event: &EventRecord) -> Tally {
    match event.event_type.as_str() {
        "Added" => {
            let amount: i64 = event.decode().expect("Added carries an i64 amount");
            state.total += amount;
            state.entries += 1;
        }
        "Reset" => state.total = 0,
        _ => {}
    }
    state
}

pub fn reducer() -> SerdeReducer<Tally, fn(Tally, &EventRecord) -> Tally> {
    SerdeReducer::new(Tally::default(), apply as fn(Tally, &EventRecord) -> Tally)
}

pub fn added(amount: i64) -> NewEvent {
    NewEvent::encode("Added", &amount).unwrap()
}
