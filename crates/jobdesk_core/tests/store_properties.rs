use std::collections::BTreeSet;

use jobdesk_core::{
    index_by_url, running_count, ApplicationRecord, ApplicationStatus, ApplicationsStore, OpaqueId,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    jobdesk_logging::initialize_for_tests();
}

fn record(id: i64, url: &str, status: &str) -> ApplicationRecord {
    ApplicationRecord::new(id, url, ApplicationStatus::from_wire(status))
}

fn sample_lists() -> Vec<Vec<ApplicationRecord>> {
    vec![
        Vec::new(),
        vec![record(1, "https://a", "QUEUED")],
        vec![
            record(1, "https://a", "QUEUED"),
            record(2, "https://b", "IN_PROGRESS"),
            record(3, "https://a", "DONE"),
            record(4, "https://c", "WEIRD_STATUS"),
            record(5, "https://b", "FAILED"),
        ],
        vec![
            record(10, "https://x", "SUBMITTED"),
            record(11, "https://y", "DRAFTED"),
            record(12, "https://z", "IN_PROGRESS"),
        ],
    ]
}

#[test]
fn index_has_one_entry_per_distinct_url_pointing_at_last_record() {
    init_logging();
    for list in sample_lists() {
        let mut store = ApplicationsStore::new();
        let generation = store.activate();
        assert!(store.complete_fetch(generation, Ok(list.clone())));

        let distinct: BTreeSet<&str> = list.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(store.index_len(), distinct.len());
        assert_eq!(
            store.indexed_urls().collect::<BTreeSet<_>>(),
            distinct
        );

        for url in distinct {
            let last = list.iter().rev().find(|r| r.url == url).unwrap();
            assert_eq!(store.record_for_url(url), Some(last));
        }
        assert_eq!(index_by_url(&list).len(), store.index_len());
    }
}

#[test]
fn running_count_matches_queued_and_in_progress() {
    init_logging();
    for list in sample_lists() {
        let expected = list
            .iter()
            .filter(|r| {
                matches!(
                    r.status,
                    ApplicationStatus::Queued | ApplicationStatus::InProgress
                )
            })
            .count();

        let mut store = ApplicationsStore::new();
        let generation = store.activate();
        store.complete_fetch(generation, Ok(list.clone()));
        assert_eq!(store.running_count(), expected);
        assert_eq!(running_count(&list), expected);
    }
}

#[test]
fn empty_list_yields_zero_running() {
    let mut store = ApplicationsStore::new();
    let generation = store.activate();
    store.complete_fetch(generation, Ok(Vec::new()));
    assert_eq!(store.running_count(), 0);
    assert_eq!(store.index_len(), 0);
    assert!(!store.loading());
}

#[test]
fn failed_fetch_keeps_previous_list_and_views() {
    init_logging();
    let mut store = ApplicationsStore::new();
    let first = store.activate();
    store.complete_fetch(
        first,
        Ok(vec![
            record(1, "https://a", "QUEUED"),
            record(2, "https://b", "DONE"),
        ]),
    );
    let before = store.clone();

    let second = store.begin_fetch().unwrap();
    assert!(store.loading());
    assert!(store.complete_fetch(second, Err("Failed to fetch applications".into())));

    assert_eq!(store.list(), before.list());
    assert_eq!(store.running_count(), before.running_count());
    assert_eq!(
        store.indexed_urls().collect::<Vec<_>>(),
        before.indexed_urls().collect::<Vec<_>>()
    );
    assert_eq!(store.last_error(), Some("Failed to fetch applications"));
    assert!(!store.loading());
}

#[test]
fn error_clears_on_next_successful_fetch() {
    let mut store = ApplicationsStore::new();
    let first = store.activate();
    store.complete_fetch(first, Err("boom".into()));
    assert_eq!(store.last_error(), Some("boom"));

    let second = store.begin_fetch().unwrap();
    store.complete_fetch(second, Ok(vec![record(1, "https://a", "DONE")]));
    assert_eq!(store.last_error(), None);
    assert_eq!(store.list().len(), 1);
}

#[test]
fn result_after_deactivation_is_ignored() {
    init_logging();
    let mut store = ApplicationsStore::new();
    let generation = store.activate();
    store.deactivate();

    let before = store.clone();
    let applied = store.complete_fetch(generation, Ok(vec![record(1, "https://a", "QUEUED")]));

    assert!(!applied);
    assert_eq!(store, before);
    assert!(store.list().is_empty());
    assert_eq!(store.running_count(), 0);
    assert!(!store.loading());
    assert_eq!(store.begin_fetch(), None);
}

#[test]
fn older_result_after_newer_is_discarded() {
    init_logging();
    let mut store = ApplicationsStore::new();
    let slow = store.activate();
    let fast = store.begin_fetch().unwrap();

    assert!(store.complete_fetch(fast, Ok(vec![record(2, "https://new", "IN_PROGRESS")])));
    assert!(!store.complete_fetch(slow, Ok(vec![record(1, "https://old", "DONE")])));

    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].url, "https://new");
    assert!(store.record_for_url("https://old").is_none());
}

#[test]
fn earlier_completion_applies_but_loading_waits_for_latest() {
    let mut store = ApplicationsStore::new();
    let old = store.activate();
    let latest = store.begin_fetch().unwrap();

    assert!(store.complete_fetch(old, Err("late".into())));
    assert!(store.loading());
    assert_eq!(store.last_error(), Some("late"));

    assert!(store.complete_fetch(latest, Ok(Vec::new())));
    assert!(!store.loading());
    assert_eq!(store.last_error(), None);
}

#[test]
fn backend_slower_than_poll_interval_still_updates_list() {
    init_logging();
    let mut store = ApplicationsStore::new();
    let mut in_flight = store.activate();
    let mut applied = 0;

    // Every response lands just after the next tick has issued a new fetch.
    for round in 0..10 {
        let next = store.begin_fetch().unwrap();
        let list = vec![record(round, "https://a", "IN_PROGRESS")];
        if store.complete_fetch(in_flight, Ok(list)) {
            applied += 1;
        }
        assert_eq!(store.list()[0].id, OpaqueId::Int(round));
        assert_eq!(store.running_count(), 1);
        assert!(store.loading());
        in_flight = next;
    }
    assert_eq!(applied, 10);

    assert!(store.complete_fetch(in_flight, Ok(vec![record(99, "https://a", "DONE")])));
    assert!(!store.loading());
    assert_eq!(store.running_count(), 0);
    assert_eq!(store.record_for_url("https://a").map(|r| &r.id), Some(&OpaqueId::Int(99)));

    // A straggler older than what is shown changes nothing.
    let before = store.clone();
    assert!(!store.complete_fetch(in_flight - 1, Ok(Vec::new())));
    assert_eq!(store, before);
}
