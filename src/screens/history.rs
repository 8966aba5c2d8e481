use std::sync::Arc;

use crate::{
    error::StoreResult,
    record::Record,
    store::{LoadState, RecordStore},
};

pub const DEFAULT_PAGE_SIZE: usize = 7;

/// State behind the history screen: a page cursor over the record store.
pub struct HistoryView {
    store: Arc<RecordStore>,
    page: usize,
    page_size: usize,
}

impl HistoryView {
    pub fn new(store: Arc<RecordStore>, page_size: usize) -> Self {
        Self {
            store,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page_number(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub async fn state(&self) -> LoadState {
        self.store.state().await
    }

    pub fn is_refreshing(&self) -> bool {
        self.store.is_refreshing()
    }

    /// Reloads on every visit so changes made elsewhere show up.
    pub async fn on_focus(&mut self) -> StoreResult<()> {
        self.store.load_all().await?;
        self.clamp_page().await;
        Ok(())
    }

    pub async fn refresh(&mut self) -> StoreResult<()> {
        self.store.refresh().await?;
        self.clamp_page().await;
        Ok(())
    }

    pub async fn current_page(&self) -> Vec<Record> {
        self.store.page(self.page, self.page_size).await
    }

    pub async fn page_count(&self) -> usize {
        self.store.len().await.div_ceil(self.page_size).max(1)
    }

    /// Moves forward unless the next page would be empty.
    pub async fn next_page(&mut self) -> bool {
        let target = self.page + 1;
        if self.store.page(target, self.page_size).await.is_empty() {
            return false;
        }

        self.page = target;
        true
    }

    pub async fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }

        let target = self.page - 1;
        if self.store.page(target, self.page_size).await.is_empty() {
            return false;
        }

        self.page = target;
        true
    }

    pub async fn delete(&mut self, name: &str) -> StoreResult<usize> {
        let removed = self.store.delete(name).await?;
        self.clamp_page().await;
        Ok(removed)
    }

    async fn clamp_page(&mut self) {
        while self.page > 1 && self.store.page(self.page, self.page_size).await.is_empty() {
            self.page -= 1;
        }
    }
}
