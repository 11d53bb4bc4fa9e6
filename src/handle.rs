//! Shared table handle with debounced search
//!
//! [`TableHandle`] owns a [`DataTable`] behind an `Arc<RwLock<..>>` together
//! with a [`SearchDebouncer`]. A driver task applies every settled search
//! term to the table, so the host can forward raw keystrokes and read
//! consistent views from anywhere.

use crate::core::error::Result;
use crate::core::record::Record;
use crate::search::SearchDebouncer;
use crate::table::DataTable;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, watch};
use tokio::task::JoinHandle;

/// A table shared between the host and its debounced search driver
///
/// Must be created inside a tokio runtime.
pub struct TableHandle<T: Record> {
    table: Arc<RwLock<DataTable<T>>>,
    debouncer: SearchDebouncer,
    driver: JoinHandle<()>,
}

impl<T: Record> TableHandle<T> {
    /// Wrap a table, debouncing search with its configured quiet period
    pub fn new(table: DataTable<T>) -> Self {
        let debouncer = SearchDebouncer::spawn(table.config().search_debounce());
        let table = Arc::new(RwLock::new(table));
        let driver = tokio::spawn(drive_search(table.clone(), debouncer.subscribe()));
        Self {
            table,
            debouncer,
            driver,
        }
    }

    /// Forward one raw search string (one per keystroke)
    pub fn set_search_term(&self, raw: impl Into<String>) -> Result<()> {
        self.debouncer.push(raw)
    }

    /// Clear search and column filters on the table and in the debouncer
    ///
    /// Prefer this over [`DataTable::clear_filters`] through [`write`](Self::write):
    /// the debouncer would otherwise still hold the old settled term and
    /// swallow it when the user types it again.
    pub async fn clear_filters(&self) -> Result<()> {
        self.table.write().await.clear_filters();
        self.debouncer.reset()
    }

    /// Clear only the search term, on the table and in the debouncer
    pub async fn clear_search(&self) -> Result<()> {
        self.table.write().await.clear_search();
        self.debouncer.reset()
    }

    /// Receiver notified whenever a search term settles
    pub fn settled_search(&self) -> watch::Receiver<String> {
        self.debouncer.subscribe()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, DataTable<T>> {
        self.table.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, DataTable<T>> {
        self.table.write().await
    }

    /// The shared table, for handing to other tasks
    pub fn shared(&self) -> Arc<RwLock<DataTable<T>>> {
        self.table.clone()
    }
}

impl<T: Record> Drop for TableHandle<T> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive_search<T: Record>(
    table: Arc<RwLock<DataTable<T>>>,
    mut settled: watch::Receiver<String>,
) {
    while settled.changed().await.is_ok() {
        let term = settled.borrow_and_update().clone();
        let applied = table.write().await.set_search_term(term);
        tracing::trace!(applied, "Applied settled search term to table");
    }
    tracing::debug!("Search driver stopped");
}
