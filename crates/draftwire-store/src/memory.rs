//! In-memory row store

use async_trait::async_trait;
use draftwire_domain::traits::{RowStore, StoreError};
use draftwire_domain::{Draft, Row, RowRef, Status};
use std::sync::{Arc, Mutex};

/// In-memory implementation of `RowStore`
///
/// Rows live in a shared vector behind a mutex; clones share the same
/// table, so the server, the scan worker, and the webhook all observe
/// one another's writes. Row references are 1-based insertion indices.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowStore {
    rows: Arc<Mutex<Vec<Row>>>,
}

impl MemoryRowStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Whether the store holds no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index(row: RowRef) -> Option<usize> {
        (row >= 1).then(|| (row - 1) as usize)
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn append(&self, row: Row) -> Result<RowRef, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        rows.push(row);
        Ok(rows.len() as RowRef)
    }

    async fn get(&self, row: RowRef) -> Result<Option<Row>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::index(row).and_then(|i| rows.get(i).cloned()))
    }

    async fn all(&self) -> Result<Vec<(RowRef, Row)>, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .enumerate()
            .map(|(i, row)| ((i + 1) as RowRef, row.clone()))
            .collect())
    }

    async fn set_status(&self, row: RowRef, status: Status) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = Self::index(row)
            .and_then(|i| rows.get_mut(i))
            .ok_or(StoreError::NotFound(row))?;
        slot.status = status;
        Ok(())
    }

    async fn set_status_if(
        &self,
        row: RowRef,
        expected: &Status,
        status: Status,
    ) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = Self::index(row)
            .and_then(|i| rows.get_mut(i))
            .ok_or(StoreError::NotFound(row))?;
        if slot.status != *expected {
            return Ok(false);
        }
        slot.status = status;
        Ok(true)
    }

    async fn set_draft(&self, row: RowRef, draft: &Draft) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let slot = Self::index(row)
            .and_then(|i| rows.get_mut(i))
            .ok_or(StoreError::NotFound(row))?;
        slot.summary = draft.summary.clone();
        slot.post = draft.post.clone();
        Ok(())
    }
}
