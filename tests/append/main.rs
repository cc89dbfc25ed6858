use versioned_store::{EventStore, NewEvent, StoreError};

fn event(event_type: &str, payload: &str) -> NewEvent {
    NewEvent::encode(event_type, &payload).unwrap()
}

// --- Version Assignment ---

#[test]
fn appends_assign_contiguous_versions_from_one() {
    let store = EventStore::in_memory();

    let commit = store
        .append_events(
            "acct-1",
            vec![event("Opened", "alice"), event("Deposited", "10")],
            0,
        )
        .unwrap();

    assert_eq!(commit.current_version, 2);
    assert_eq!(commit.events[0].version, 1);
    assert_eq!(commit.events[1].version, 2);

    let commit = store
        .append_events("acct-1", vec![event("Deposited", "5")], 2)
        .unwrap();
    assert_eq!(commit.current_version, 3);
    assert_eq!(commit.events[0].version, 3);
}

#[test]
fn n_appends_yield_version_n_with_each_version_once() {
    let store = EventStore::in_memory();

    for i in 0..7u64 {
        store
            .append_events("acct-1", vec![event("Ticked", &i.to_string())], i)
            .unwrap();
    }

    assert_eq!(store.get_current_version("acct-1").unwrap(), 7);
    let versions: Vec<u64> = store
        .get_events("acct-1", 0, None)
        .unwrap()
        .iter()
        .map(|e| e.version)
        .collect();
    assert_eq!(versions, (1..=7).collect::<Vec<u64>>());
}

#[test]
fn commit_records_carry_assigned_identity() {
    let store = EventStore::in_memory();
    let commit = store
        .append_events(
            "acct-1",
            vec![event("Opened", "alice").with_metadata("correlation_id", "req-1")],
            0,
        )
        .unwrap();

    let record = &commit.events[0];
    assert_eq!(record.aggregate_id, "acct-1");
    assert!(!record.event_id.is_nil());
    assert_eq!(record.meta("correlation_id"), Some("req-1"));
    let payload: String = record.decode().unwrap();
    assert_eq!(payload, "alice");
}

// --- Optimistic Concurrency (sequential) ---

#[test]
fn stale_expected_version_conflicts_without_partial_write() {
    let store = EventStore::in_memory();

    store
        .append_events(
            "acct-1",
            vec![
                event("Opened", "alice"),
                event("Deposited", "10"),
                event("Deposited", "20"),
            ],
            0,
        )
        .unwrap();
    assert_eq!(store.get_current_version("acct-1").unwrap(), 3);

    let err = store
        .append_events("acct-1", vec![event("Deposited", "30")], 0)
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::ConcurrencyConflict {
            aggregate_id: "acct-1".into(),
            expected: 0,
            actual: 3,
        }
    );
    assert_eq!(store.get_current_version("acct-1").unwrap(), 3);
    assert_eq!(store.get_events("acct-1", 0, None).unwrap().len(), 3);

    store
        .append_events("acct-1", vec![event("Deposited", "30")], 3)
        .unwrap();
    assert_eq!(store.get_current_version("acct-1").unwrap(), 4);
}

#[test]
fn conflict_loser_can_retry_after_reread() {
    let store = EventStore::in_memory();
    store.append_events("acct-1", vec![event("Opened", "a")], 0).unwrap();

    let stale = store
        .append_events("acct-1", vec![event("Deposited", "1")], 0)
        .unwrap_err();
    let StoreError::ConcurrencyConflict { actual, .. } = stale else {
        panic!("expected a concurrency conflict");
    };

    store
        .append_events("acct-1", vec![event("Deposited", "1")], actual)
        .unwrap();
    assert_eq!(store.get_current_version("acct-1").unwrap(), 2);
}

// --- Reads ---

#[test]
fn get_events_respects_from_and_to_bounds() {
    let store = EventStore::in_memory();
    for i in 0..5u64 {
        store
            .append_events("acct-1", vec![event("Ticked", &i.to_string())], i)
            .unwrap();
    }

    let after_three: Vec<u64> = store
        .get_events("acct-1", 3, None)
        .unwrap()
        .iter()
        .map(|e| e.version)
        .collect();
    assert_eq!(after_three, vec![4, 5]);

    let window: Vec<u64> = store
        .get_events("acct-1", 1, Some(3))
        .unwrap()
        .iter()
        .map(|e| e.version)
        .collect();
    assert_eq!(window, vec![2, 3]);

    assert!(store.get_events("acct-1", 5, None).unwrap().is_empty());
    assert!(store.get_events("acct-1", 9, None).unwrap().is_empty());
}

#[test]
fn unknown_aggregate_reads_as_empty() {
    let store = EventStore::in_memory();
    assert_eq!(store.get_current_version("ghost").unwrap(), 0);
    assert!(store.get_events("ghost", 0, None).unwrap().is_empty());
    assert!(!store.exists("ghost").unwrap());
}

#[test]
fn exists_after_first_commit() {
    let store = EventStore::in_memory();
    store.append_events("acct-1", vec![event("Opened", "a")], 0).unwrap();
    assert!(store.exists("acct-1").unwrap());
}

// --- Aggregate Isolation ---

#[test]
fn aggregates_version_independently() {
    let store = EventStore::in_memory();

    store.append_events("acct-1", vec![event("Opened", "a")], 0).unwrap();
    store
        .append_events(
            "acct-2",
            vec![event("Opened", "b"), event("Deposited", "10")],
            0,
        )
        .unwrap();

    assert_eq!(store.get_current_version("acct-1").unwrap(), 1);
    assert_eq!(store.get_current_version("acct-2").unwrap(), 2);

    let acct_1 = store.get_events("acct-1", 0, None).unwrap();
    assert!(acct_1.iter().all(|e| e.aggregate_id == "acct-1"));
}
