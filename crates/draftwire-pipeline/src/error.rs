//! Error types for the pipeline

use draftwire_domain::traits::StoreError;
use thiserror::Error;

/// Errors surfaced to the pipeline's caller
///
/// Row-level fetch and generation failures are recorded in the row's
/// status and never reach the caller; only store failures - which
/// cannot themselves be recorded in the store - propagate.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Row store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
