use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::{Mutex, RwLock};

use crate::{
    error::{StoreError, StoreResult},
    record::Record,
    storage::KeyValueStore,
};

pub const RECORDS_KEY: &str = "records";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

struct LoadedRecords {
    state: LoadState,
    // newest first
    records: Vec<Record>,
}

/// Counts a running refresh until dropped, so a cancelled refresh is released too.
struct RefreshInFlight<'a>(&'a AtomicUsize);

impl<'a> RefreshInFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for RefreshInFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Record list persisted as one JSON array under [`RECORDS_KEY`].
///
/// The backend keeps records in append order; everything handed out by the
/// store is newest first. Saves and deletes are read-modify-write cycles over
/// the whole array, so only one of them may run at a time: an overlapping
/// write is rejected with [`StoreError::Busy`], loads wait for it instead.
pub struct RecordStore {
    backend: Arc<dyn KeyValueStore>,
    write_guard: Mutex<()>,
    loaded: RwLock<LoadedRecords>,
    refreshes_in_flight: AtomicUsize,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_guard: Mutex::new(()),
            loaded: RwLock::new(LoadedRecords {
                state: LoadState::Unloaded,
                records: Vec::new(),
            }),
            refreshes_in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn state(&self) -> LoadState {
        self.loaded.read().await.state
    }

    /// True while at least one [`RecordStore::refresh`] is running.
    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Snapshot of the loaded records, newest first.
    pub async fn records(&self) -> Vec<Record> {
        self.loaded.read().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.loaded.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn load_all(&self) -> StoreResult<Vec<Record>> {
        let _guard = self.write_guard.lock().await;
        self.reload().await
    }

    /// Reloads while showing the refreshing flag.
    pub async fn refresh(&self) -> StoreResult<Vec<Record>> {
        let _in_flight = RefreshInFlight::enter(&self.refreshes_in_flight);
        self.load_all().await
    }

    pub async fn append(&self, record: Record) -> StoreResult<()> {
        let _guard = self.write_guard.try_lock().map_err(|_| StoreError::Busy)?;
        let name = record.name.clone();

        let mut stored = self.read_stored().await?;
        stored.push(record);
        self.write_stored(&stored).await?;

        stored.reverse();
        let count = stored.len();
        let mut loaded = self.loaded.write().await;
        loaded.records = stored;
        loaded.state = LoadState::Loaded;

        log::info!("Saved record {} [record_count = {}]", name, count);
        Ok(())
    }

    /// Removes every record named `name` and returns how many were removed.
    ///
    /// The loaded records stay untouched unless the write succeeds.
    pub async fn delete(&self, name: &str) -> StoreResult<usize> {
        let _guard = self.write_guard.try_lock().map_err(|_| StoreError::Busy)?;

        if self.state().await != LoadState::Loaded {
            self.reload().await?;
        }

        let remaining: Vec<Record> = self
            .loaded
            .read()
            .await
            .records
            .iter()
            .filter(|record| record.name != name)
            .cloned()
            .collect();

        let mut append_order = remaining.clone();
        append_order.reverse();
        self.write_stored(&append_order).await?;

        let mut loaded = self.loaded.write().await;
        let removed = loaded.records.len() - remaining.len();
        loaded.records = remaining;

        log::info!("Deleted {} record(s) named {}", removed, name);
        Ok(removed)
    }

    /// 1-indexed page of the loaded records. Empty when out of range.
    pub async fn page(&self, page_number: usize, page_size: usize) -> Vec<Record> {
        if page_number == 0 || page_size == 0 {
            return Vec::new();
        }

        let loaded = self.loaded.read().await;
        loaded
            .records
            .iter()
            .skip((page_number - 1).saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect()
    }

    async fn reload(&self) -> StoreResult<Vec<Record>> {
        let previous_state = {
            let mut loaded = self.loaded.write().await;
            std::mem::replace(&mut loaded.state, LoadState::Loading)
        };

        match self.read_stored().await {
            Ok(mut records) => {
                records.reverse();
                let mut loaded = self.loaded.write().await;
                loaded.records = records.clone();
                loaded.state = LoadState::Loaded;

                log::debug!("Loaded {} record(s)", records.len());
                Ok(records)
            }
            Err(error) => {
                self.loaded.write().await.state = previous_state;
                log::error!("Failed to load records: {}", error);
                Err(error)
            }
        }
    }

    // append order
    async fn read_stored(&self) -> StoreResult<Vec<Record>> {
        let raw = self
            .backend
            .get(RECORDS_KEY)
            .await
            .map_err(StoreError::Backend)?;

        match raw {
            Some(raw) => serde_json::from_str(&raw).map_err(StoreError::Read),
            None => Ok(Vec::new()),
        }
    }

    async fn write_stored(&self, records: &[Record]) -> StoreResult<()> {
        let raw = serde_json::to_string(records).map_err(StoreError::Serialize)?;
        self.backend
            .set(RECORDS_KEY, raw)
            .await
            .map_err(StoreError::Write)
    }
}
