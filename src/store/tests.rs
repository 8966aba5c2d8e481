use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::*;
use crate::{
    error::StoreError,
    record::Record,
    storage::{InMemoryKeyValueStore, KeyValueStore},
    time::{ShiftDuration, TimeOfDay},
};

fn record(name: &str) -> Record {
    Record {
        name: name.to_string(),
        date: "2025-05-31 12:00:00".to_string(),
        duration: ShiftDuration::new(8, 0).unwrap(),
        end_time: TimeOfDay::from_hm(20, 0).unwrap(),
    }
}

fn names(records: &[Record]) -> Vec<&str> {
    records.iter().map(|record| record.name.as_str()).collect()
}

fn store() -> (Arc<InMemoryKeyValueStore>, RecordStore) {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let store = RecordStore::new(backend.clone());
    (backend, store)
}

async fn store_with(count: usize) -> RecordStore {
    let (_, store) = store();
    for i in 0..count {
        store.append(record(&format!("r{i}"))).await.unwrap();
    }
    store
}

/// Delegates to an in-memory store and can be told to fail writes.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryKeyValueStore,
    fail_writes: AtomicBool,
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("disk full");
        }
        self.inner.set(key, value).await
    }
}

/// Holds every write until released.
#[derive(Default)]
struct GatedStore {
    inner: InMemoryKeyValueStore,
    write_started: Notify,
    release: Notify,
}

#[async_trait]
impl KeyValueStore for GatedStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.write_started.notify_one();
        self.release.notified().await;
        self.inner.set(key, value).await
    }
}

/// Holds reads once `gate_reads` is set, until released.
#[derive(Default)]
struct GatedReadStore {
    inner: InMemoryKeyValueStore,
    gate_reads: AtomicBool,
    read_started: Notify,
    release: Notify,
}

#[async_trait]
impl KeyValueStore for GatedReadStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.gate_reads.load(Ordering::SeqCst) {
            self.read_started.notify_one();
            self.release.notified().await;
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.inner.set(key, value).await
    }
}

/// Polls `future` once and reports whether it is still pending.
async fn is_pending<F: Future + Unpin>(future: &mut F) -> bool {
    tokio::select! {
        biased;
        _ = future => false,
        _ = std::future::ready(()) => true,
    }
}

#[tokio::test]
async fn empty_storage_loads_no_records() {
    let (_, store) = store();
    assert_eq!(store.state().await, LoadState::Unloaded);

    let records = store.load_all().await.unwrap();

    assert!(records.is_empty());
    assert_eq!(store.state().await, LoadState::Loaded);
}

#[tokio::test]
async fn appended_record_is_loaded_first() {
    let store = store_with(3).await;

    store.append(record("latest")).await.unwrap();
    let records = store.load_all().await.unwrap();

    assert_eq!(names(&records), ["latest", "r2", "r1", "r0"]);
}

#[tokio::test]
async fn backend_keeps_append_order() {
    let (backend, store) = store();

    store.append(record("first")).await.unwrap();
    store.append(record("second")).await.unwrap();

    let raw = backend.get(RECORDS_KEY).await.unwrap().unwrap();
    let stored: Vec<Record> = serde_json::from_str(&raw).unwrap();
    assert_eq!(names(&stored), ["first", "second"]);
}

#[tokio::test]
async fn loading_twice_returns_equal_sequences() {
    let store = store_with(5).await;

    let first = store.load_all().await.unwrap();
    let second = store.load_all().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn delete_removes_only_matching_records() {
    let store = store_with(5).await;

    let removed = store.delete("r2").await.unwrap();
    let records = store.load_all().await.unwrap();

    assert_eq!(removed, 1);
    assert_eq!(names(&records), ["r4", "r3", "r1", "r0"]);
}

#[tokio::test]
async fn delete_removes_every_record_sharing_a_name() {
    let store = store_with(2).await;
    store.append(record("r0")).await.unwrap();

    let removed = store.delete("r0").await.unwrap();

    assert_eq!(removed, 2);
    assert_eq!(names(&store.load_all().await.unwrap()), ["r1"]);
}

#[tokio::test]
async fn delete_loads_an_unloaded_store_first() {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let writer = RecordStore::new(backend.clone());
    writer.append(record("a")).await.unwrap();
    writer.append(record("b")).await.unwrap();

    let reader = RecordStore::new(backend);
    reader.delete("a").await.unwrap();

    assert_eq!(names(&reader.records().await), ["b"]);
    assert_eq!(names(&writer.load_all().await.unwrap()), ["b"]);
}

#[tokio::test]
async fn failed_delete_leaves_loaded_records_unchanged() {
    let backend = Arc::new(FlakyStore::default());
    let store = RecordStore::new(backend.clone());
    store.append(record("a")).await.unwrap();
    store.append(record("b")).await.unwrap();

    backend.fail_writes.store(true, Ordering::SeqCst);
    let result = store.delete("a").await;

    assert!(matches!(result, Err(StoreError::Write(_))));
    assert_eq!(names(&store.records().await), ["b", "a"]);
    assert_eq!(names(&store.load_all().await.unwrap()), ["b", "a"]);
}

#[tokio::test]
async fn failed_append_is_reported() {
    let backend = Arc::new(FlakyStore::default());
    let store = RecordStore::new(backend.clone());
    backend.fail_writes.store(true, Ordering::SeqCst);

    let result = store.append(record("a")).await;

    assert!(matches!(result, Err(StoreError::Write(_))));
    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_storage_fails_to_load() {
    let (backend, store) = store();
    store.append(record("a")).await.unwrap();
    store.load_all().await.unwrap();

    backend
        .set(RECORDS_KEY, "{not json".to_string())
        .await
        .unwrap();
    let result = store.load_all().await;

    assert!(matches!(result, Err(StoreError::Read(_))));
    assert_eq!(store.state().await, LoadState::Loaded);
    assert_eq!(names(&store.records().await), ["a"]);
}

#[tokio::test]
async fn corrupt_storage_blocks_append() {
    let (backend, store) = store();
    backend.set(RECORDS_KEY, "oops".to_string()).await.unwrap();

    let result = store.append(record("a")).await;

    assert!(matches!(result, Err(StoreError::Read(_))));
    assert_eq!(
        backend.get(RECORDS_KEY).await.unwrap().as_deref(),
        Some("oops")
    );
}

#[tokio::test]
async fn pages_are_sliced_from_newest() {
    let store = store_with(10).await;
    store.load_all().await.unwrap();

    let first = store.page(1, 7).await;
    let second = store.page(2, 7).await;

    assert_eq!(first.len(), 7);
    assert_eq!(second.len(), 3);
    assert!(store.page(3, 7).await.is_empty());
    assert_eq!(first[0].name, "r9");
    assert_eq!(names(&second), ["r2", "r1", "r0"]);
}

#[tokio::test]
async fn degenerate_pages_are_empty() {
    let store = store_with(3).await;

    assert!(store.page(0, 7).await.is_empty());
    assert!(store.page(1, 0).await.is_empty());
    assert!(store.page(usize::MAX, 7).await.is_empty());
}

#[tokio::test]
async fn overlapping_writes_are_rejected() {
    let backend = Arc::new(GatedStore::default());
    let store = Arc::new(RecordStore::new(backend.clone()));

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.append(record("first")).await }
    });
    backend.write_started.notified().await;

    let second = store.append(record("second")).await;
    let delete = store.delete("first").await;
    backend.release.notify_one();

    assert!(matches!(second, Err(StoreError::Busy)));
    assert!(matches!(delete, Err(StoreError::Busy)));
    first.await.unwrap().unwrap();
    assert_eq!(names(&store.load_all().await.unwrap()), ["first"]);
}

#[tokio::test]
async fn refresh_reloads_and_clears_refreshing_flag() {
    let store = store_with(2).await;
    assert!(!store.is_refreshing());

    let records = store.refresh().await.unwrap();

    assert_eq!(names(&records), ["r1", "r0"]);
    assert!(!store.is_refreshing());
    assert_eq!(store.state().await, LoadState::Loaded);
}

#[tokio::test]
async fn refresh_is_visible_while_loading() {
    let backend = Arc::new(GatedReadStore::default());
    let store = Arc::new(RecordStore::new(backend.clone()));
    store.append(record("a")).await.unwrap();
    backend.gate_reads.store(true, Ordering::SeqCst);

    let refresh = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.refresh().await }
    });
    backend.read_started.notified().await;

    assert!(store.is_refreshing());
    assert_eq!(store.state().await, LoadState::Loading);

    backend.release.notify_one();
    let records = refresh.await.unwrap().unwrap();

    assert_eq!(names(&records), ["a"]);
    assert!(!store.is_refreshing());
    assert_eq!(store.state().await, LoadState::Loaded);
}

#[tokio::test]
async fn overlapping_refreshes_stay_visible_until_the_last_one_ends() {
    let backend = Arc::new(GatedReadStore::default());
    let store = Arc::new(RecordStore::new(backend.clone()));
    backend.gate_reads.store(true, Ordering::SeqCst);

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.refresh().await }
    });
    backend.read_started.notified().await;

    let second = store.refresh();
    tokio::pin!(second);
    assert!(is_pending(&mut second).await);

    backend.release.notify_one();
    first.await.unwrap().unwrap();
    assert!(store.is_refreshing());

    backend.release.notify_one();
    second.await.unwrap();
    assert!(!store.is_refreshing());
}

#[tokio::test]
async fn load_waits_for_in_flight_write() {
    let backend = Arc::new(GatedStore::default());
    let store = Arc::new(RecordStore::new(backend.clone()));

    let append = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.append(record("first")).await }
    });
    backend.write_started.notified().await;

    let load = store.load_all();
    tokio::pin!(load);
    assert!(is_pending(&mut load).await);

    backend.release.notify_one();
    append.await.unwrap().unwrap();

    assert_eq!(names(&load.await.unwrap()), ["first"]);
}

#[tokio::test]
async fn refresh_clears_flag_on_failure() {
    let (backend, store) = store();
    backend.set(RECORDS_KEY, "[".to_string()).await.unwrap();

    assert!(store.refresh().await.is_err());
    assert!(!store.is_refreshing());
    assert_eq!(store.state().await, LoadState::Unloaded);
}

#[tokio::test]
async fn reload_picks_up_out_of_band_changes() {
    let backend = Arc::new(InMemoryKeyValueStore::new());
    let screen_a = RecordStore::new(backend.clone());
    let screen_b = RecordStore::new(backend);
    screen_a.append(record("a")).await.unwrap();
    screen_b.load_all().await.unwrap();

    screen_a.append(record("b")).await.unwrap();
    assert_eq!(names(&screen_b.records().await), ["a"]);

    screen_b.load_all().await.unwrap();
    assert_eq!(names(&screen_b.records().await), ["b", "a"]);
}
