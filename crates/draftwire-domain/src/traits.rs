//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates; the pipeline
//! and webhook are generic over them so tests run against fakes with
//! no network access.

use crate::draft::Draft;
use crate::row::{Row, RowRef};
use crate::status::Status;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Errors from the row store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row reference does not exist
    #[error("Row not found: {0}")]
    NotFound(RowRef),

    /// Underlying storage failure
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Errors fetching an article
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success HTTP status from the article host
    #[error("Fetch {0}")]
    Status(u16),

    /// Network-level failure before any response arrived
    #[error("Fetch failed: {0}")]
    Transport(String),
}

/// Errors from the text-generation provider
///
/// Quota exhaustion is a distinct variant so callers classify by tag,
/// never by matching message substrings.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The upstream provider reported quota exhaustion
    #[error("Quota exhausted: {0}")]
    Quota(String),

    /// The upstream provider reported some other error
    #[error("Generation error: {0}")]
    Upstream(String),

    /// Network-level failure reaching the provider
    #[error("Generation request failed: {0}")]
    Transport(String),

    /// The provider response did not have the expected shape
    #[error("Invalid generation response: {0}")]
    InvalidResponse(String),
}

/// Trait for storing and retrieving rows
///
/// Implemented by the infrastructure layer (draftwire-store). The
/// store is the only state shared between the processing pipeline and
/// the approval webhook, so racing transitions must go through
/// [`set_status_if`](RowStore::set_status_if).
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Append a new row, returning its stable reference
    async fn append(&self, row: Row) -> Result<RowRef, StoreError>;

    /// Get a row by reference
    async fn get(&self, row: RowRef) -> Result<Option<Row>, StoreError>;

    /// List all rows with their references, in insertion order
    async fn all(&self) -> Result<Vec<(RowRef, Row)>, StoreError>;

    /// Unconditionally set a row's status
    async fn set_status(&self, row: RowRef, status: Status) -> Result<(), StoreError>;

    /// Set a row's status only if its current status equals `expected`
    ///
    /// Returns whether the transition was applied. This is the
    /// compare-and-set primitive that keeps concurrent webhook and
    /// scan mutations from clobbering each other.
    async fn set_status_if(
        &self,
        row: RowRef,
        expected: &Status,
        status: Status,
    ) -> Result<bool, StoreError>;

    /// Persist a generated draft into the row's summary/post cells
    async fn set_draft(&self, row: RowRef, draft: &Draft) -> Result<(), StoreError>;
}

/// Trait for fetching normalized article text
///
/// Implemented by the infrastructure layer (draftwire-extractor).
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch a URL and return bounded plain text extracted from it
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Trait for text-generation provider operations
///
/// Implemented by the infrastructure layer (draftwire-llm).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a text completion for a prompt
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Trait for delivering approval requests to reviewers
///
/// Implemented by the infrastructure layer (draftwire-notifier).
/// Both operations are best-effort: failures are logged inside the
/// implementation and never surface to the caller.
#[async_trait]
pub trait ReviewNotifier: Send + Sync {
    /// Broadcast a draft with approve/reject controls to every reviewer
    async fn broadcast(&self, row: RowRef, url: &str, summary: &str, post: &str);

    /// Acknowledge a reviewer's action event so their client clears
    /// its pending indicator
    async fn answer_callback(&self, callback_id: &str, text: &str);
}

// Arc delegation so components compose over shared or dynamic ports.

#[async_trait]
impl<T: RowStore + ?Sized> RowStore for Arc<T> {
    async fn append(&self, row: Row) -> Result<RowRef, StoreError> {
        (**self).append(row).await
    }

    async fn get(&self, row: RowRef) -> Result<Option<Row>, StoreError> {
        (**self).get(row).await
    }

    async fn all(&self) -> Result<Vec<(RowRef, Row)>, StoreError> {
        (**self).all().await
    }

    async fn set_status(&self, row: RowRef, status: Status) -> Result<(), StoreError> {
        (**self).set_status(row, status).await
    }

    async fn set_status_if(
        &self,
        row: RowRef,
        expected: &Status,
        status: Status,
    ) -> Result<bool, StoreError> {
        (**self).set_status_if(row, expected, status).await
    }

    async fn set_draft(&self, row: RowRef, draft: &Draft) -> Result<(), StoreError> {
        (**self).set_draft(row, draft).await
    }
}

#[async_trait]
impl<T: ArticleSource + ?Sized> ArticleSource for Arc<T> {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_text(url).await
    }
}

#[async_trait]
impl<T: LlmProvider + ?Sized> LlmProvider for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<T: ReviewNotifier + ?Sized> ReviewNotifier for Arc<T> {
    async fn broadcast(&self, row: RowRef, url: &str, summary: &str, post: &str) {
        (**self).broadcast(row, url, summary, post).await
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) {
        (**self).answer_callback(callback_id, text).await
    }
}
