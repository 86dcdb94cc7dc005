//! Per-row processing state machine
//!
//! Drives one row through fetch → generate → notify, persisting every
//! transition: `Running` before the first external call (so a crash
//! mid-pipeline leaves observable evidence), then `Sent` on success or
//! `Error(reason)` on failure. Row-level failures are recorded in the
//! row and never propagated to the trigger, so one bad row cannot
//! abort a scan. Every exit path after the claim waits out the pacing
//! interval - the binding constraint is the shared generation quota,
//! not the row outcome.

use crate::error::PipelineError;
use crate::pacing::{Pacer, Sleeper, TokioSleeper};
use draftwire_domain::traits::{
    ArticleSource, FetchError, LlmError, LlmProvider, ReviewNotifier, RowStore, StoreError,
};
use draftwire_domain::{Row, RowRef, Status};
use draftwire_generator::Generator;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Why a row's pipeline run failed
enum RowFailure {
    Fetch(FetchError),
    Generate(LlmError),
    Store(StoreError),
}

impl RowFailure {
    /// Human-readable reason recorded in the row's status cell
    ///
    /// Quota exhaustion gets a distinguishing prefix for operator
    /// triage; everything else keeps the error's own message.
    fn reason(&self) -> String {
        match self {
            RowFailure::Fetch(e) => e.to_string(),
            RowFailure::Generate(LlmError::Quota(_)) => "quota exceeded".to_string(),
            RowFailure::Generate(e) => e.to_string(),
            RowFailure::Store(e) => e.to_string(),
        }
    }
}

/// Orchestrates extraction, generation, and notification for one row
pub struct RowProcessor<St, A, L, N, S = TokioSleeper>
where
    St: RowStore,
    A: ArticleSource,
    L: LlmProvider,
    N: ReviewNotifier,
    S: Sleeper,
{
    store: St,
    source: A,
    generator: Generator<L>,
    notifier: N,
    pacer: Pacer<S>,
}

impl<St, A, L, N> RowProcessor<St, A, L, N>
where
    St: RowStore,
    A: ArticleSource,
    L: LlmProvider,
    N: ReviewNotifier,
{
    /// Create a processor pacing over the tokio timer
    pub fn new(
        store: St,
        source: A,
        generator: Generator<L>,
        notifier: N,
        rate_limit: Duration,
    ) -> Self {
        Self {
            store,
            source,
            generator,
            notifier,
            pacer: Pacer::new(rate_limit),
        }
    }
}

impl<St, A, L, N, S> RowProcessor<St, A, L, N, S>
where
    St: RowStore,
    A: ArticleSource,
    L: LlmProvider,
    N: ReviewNotifier,
    S: Sleeper,
{
    /// Create a processor with an injected sleeper (for tests)
    pub fn with_sleeper(
        store: St,
        source: A,
        generator: Generator<L>,
        notifier: N,
        rate_limit: Duration,
        sleeper: S,
    ) -> Self {
        Self {
            store,
            source,
            generator,
            notifier,
            pacer: Pacer::with_sleeper(rate_limit, sleeper),
        }
    }

    /// The row store this processor writes to
    pub fn store(&self) -> &St {
        &self.store
    }

    /// Process one row end to end
    ///
    /// A missing row or blank URL is a no-op without side effects.
    /// Otherwise the row is marked `Running` before any external call,
    /// and ends `Sent` or `Error(reason)`; only store failures - the
    /// one thing that cannot be recorded in the store - surface to the
    /// caller.
    pub async fn process(&self, row_ref: RowRef) -> Result<(), PipelineError> {
        let Some(row) = self.store.get(row_ref).await? else {
            warn!(row = row_ref, "process called for missing row");
            return Ok(());
        };

        if row.url.trim().is_empty() {
            debug!(row = row_ref, "row has no URL, skipping");
            return Ok(());
        }

        info!(row = row_ref, url = %row.url, "processing row");
        self.store.set_status(row_ref, Status::Running).await?;

        let result = match self.run(row_ref, &row).await {
            Ok(()) => {
                info!(row = row_ref, "draft sent for approval");
                self.store
                    .set_status(row_ref, Status::Sent)
                    .await
                    .map_err(PipelineError::from)
            }
            Err(RowFailure::Store(e)) => Err(e.into()),
            Err(failure) => {
                let reason = failure.reason();
                warn!(row = row_ref, reason = %reason, "row processing failed");
                self.store
                    .set_status(row_ref, Status::Error(reason))
                    .await
                    .map_err(PipelineError::from)
            }
        };

        // Success or failure, stay under the shared generation quota
        self.pacer.pace().await;
        result
    }

    async fn run(&self, row_ref: RowRef, row: &Row) -> Result<(), RowFailure> {
        let text = self
            .source
            .fetch_text(&row.url)
            .await
            .map_err(RowFailure::Fetch)?;

        let draft = self
            .generator
            .generate(&text, &row.effective_tone())
            .await
            .map_err(RowFailure::Generate)?;

        self.store
            .set_draft(row_ref, &draft)
            .await
            .map_err(RowFailure::Store)?;

        self.notifier
            .broadcast(row_ref, &row.url, &draft.summary, &draft.post)
            .await;

        Ok(())
    }
}
