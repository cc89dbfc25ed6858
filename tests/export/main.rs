mod tally;

use tally::{added, reducer};
use versioned_store::{EventStore, ExportBundle, Reducer, StoreError};

fn seeded_store() -> EventStore<versioned_store::InMemoryEventLog, versioned_store::InMemorySnapshotStore>
{
    let store = EventStore::in_memory();
    for (i, amount) in [10, 20, 30, 40].into_iter().enumerate() {
        store
            .append_events("t1", vec![added(amount)], i as u64)
            .unwrap();
    }
    store
}

#[test]
fn export_import_round_trips_through_json() {
    let source = seeded_store();
    let blob = reducer()
        .serialize(&source.rebuild("t1", &reducer()).unwrap().state)
        .unwrap();
    source.create_snapshot("t1", 4, &blob).unwrap();

    let json = source.export_aggregate("t1").unwrap().to_json().unwrap();

    let target = EventStore::in_memory();
    let current = target
        .import_aggregate(ExportBundle::from_json(&json).unwrap())
        .unwrap();
    assert_eq!(current, 4);
    assert_eq!(target.get_current_version("t1").unwrap(), 4);

    assert_eq!(
        target.get_events("t1", 0, None).unwrap(),
        source.get_events("t1", 0, None).unwrap()
    );
    assert_eq!(
        target.get_snapshot("t1").unwrap(),
        source.get_snapshot("t1").unwrap()
    );
    assert_eq!(
        target.rebuild("t1", &reducer()).unwrap(),
        source.rebuild("t1", &reducer()).unwrap()
    );
}

#[test]
fn imported_aggregate_accepts_further_appends() {
    let source = seeded_store();
    let bundle = source.export_aggregate("t1").unwrap();

    let target = EventStore::in_memory();
    target.import_aggregate(bundle).unwrap();

    target.append_events("t1", vec![added(5)], 4).unwrap();
    assert_eq!(target.get_current_version("t1").unwrap(), 5);
}

#[test]
fn export_of_unknown_aggregate_fails() {
    let store = EventStore::in_memory();
    assert_eq!(
        store.export_aggregate("ghost").unwrap_err(),
        StoreError::AggregateNotFound("ghost".into())
    );
}

#[test]
fn import_rejects_non_contiguous_events() {
    let source = seeded_store();
    let mut bundle = source.export_aggregate("t1").unwrap();
    bundle.events.remove(1);

    let target = EventStore::in_memory();
    assert_eq!(
        target.import_aggregate(bundle).unwrap_err(),
        StoreError::VersionContinuity {
            aggregate_id: "t1".into(),
            expected: 2,
            found: 3,
        }
    );
    assert!(!target.exists("t1").unwrap());
}

#[test]
fn import_rejects_events_for_another_aggregate() {
    let source = seeded_store();
    let mut bundle = source.export_aggregate("t1").unwrap();
    bundle.aggregate_id = "t2".into();

    let target = EventStore::in_memory();
    assert!(matches!(
        target.import_aggregate(bundle),
        Err(StoreError::InvalidEvent(_))
    ));
}

#[test]
fn import_rejects_snapshot_ahead_of_events() {
    let source = seeded_store();
    let mut bundle = source.export_aggregate("t1").unwrap();
    bundle.snapshot = Some(versioned_store::SnapshotRecord::new("t1", 9, vec![1]));

    let target = EventStore::in_memory();
    assert_eq!(
        target.import_aggregate(bundle).unwrap_err(),
        StoreError::InvalidSnapshot {
            aggregate_id: "t1".into(),
            version: 9,
            current: 4,
        }
    );
}

#[test]
fn import_without_snapshot_drops_stale_snapshot() {
    let source = seeded_store();
    let bundle = source.export_aggregate("t1").unwrap();
    assert!(bundle.snapshot.is_none());

    let target = seeded_store();
    target.create_snapshot("t1", 2, &[1, 2]).unwrap();

    target.import_aggregate(bundle).unwrap();
    assert!(target.get_snapshot("t1").unwrap().is_none());
    assert_eq!(target.get_current_version("t1").unwrap(), 4);
}
