//! Recovery scan over the row store
//!
//! Catches rows whose submission-triggered processing never ran (for
//! example after a crash or a misconfigured trigger). Only rows still
//! `Pending` with a non-empty URL qualify; failed, in-flight, sent,
//! and decided rows are skipped - this is recovery, not retry.

use crate::error::PipelineError;
use crate::pacing::Sleeper;
use crate::processor::RowProcessor;
use draftwire_domain::traits::{ArticleSource, LlmProvider, ReviewNotifier, RowStore};
use draftwire_domain::Status;
use tracing::{debug, info};

/// Outcome of one recovery scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Rows examined
    pub scanned: usize,
    /// Rows claimed and processed by this scan
    pub recovered: usize,
}

/// Scans all rows and re-processes any left unprocessed
pub struct BatchScanner<St, A, L, N, S>
where
    St: RowStore,
    A: ArticleSource,
    L: LlmProvider,
    N: ReviewNotifier,
    S: Sleeper,
{
    processor: RowProcessor<St, A, L, N, S>,
}

impl<St, A, L, N, S> BatchScanner<St, A, L, N, S>
where
    St: RowStore,
    A: ArticleSource,
    L: LlmProvider,
    N: ReviewNotifier,
    S: Sleeper,
{
    /// Create a scanner driving the given processor
    pub fn new(processor: RowProcessor<St, A, L, N, S>) -> Self {
        Self { processor }
    }

    /// Scan every row and process the recoverable ones sequentially
    ///
    /// Rows are processed one at a time, never concurrently - each
    /// invocation already ends with the full pacing delay, and the
    /// binding resource is the provider quota shared across all rows.
    /// Each qualifying row is first claimed via compare-and-set
    /// `Pending → Running` so a concurrent submission-triggered run
    /// cannot process it twice.
    pub async fn scan_and_recover(&self) -> Result<ScanReport, PipelineError> {
        let rows = self.processor.store().all().await?;
        let mut report = ScanReport {
            scanned: rows.len(),
            recovered: 0,
        };

        for (row_ref, row) in rows {
            if row.status != Status::Pending || row.url.trim().is_empty() {
                continue;
            }

            let claimed = self
                .processor
                .store()
                .set_status_if(row_ref, &Status::Pending, Status::Running)
                .await?;
            if !claimed {
                debug!(row = row_ref, "row claimed elsewhere, skipping");
                continue;
            }

            self.processor.process(row_ref).await?;
            report.recovered += 1;
        }

        info!(
            scanned = report.scanned,
            recovered = report.recovered,
            "recovery scan complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::test_support::RecordingSleeper;
    use async_trait::async_trait;
    use draftwire_domain::traits::FetchError;
    use draftwire_domain::Row;
    use draftwire_generator::Generator;
    use draftwire_llm::MockProvider;
    use draftwire_notifier::RecordingNotifier;
    use draftwire_store::MemoryRowStore;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedSource;

    #[async_trait]
    impl ArticleSource for FixedSource {
        async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
            Ok("article text".to_string())
        }
    }

    fn scanner(
        store: Arc<MemoryRowStore>,
        sleeper: RecordingSleeper,
    ) -> BatchScanner<Arc<MemoryRowStore>, FixedSource, MockProvider, RecordingNotifier, RecordingSleeper>
    {
        let processor = RowProcessor::with_sleeper(
            store,
            FixedSource,
            Generator::new(MockProvider::new(r#"{"summary": "S", "post": "P"}"#)),
            RecordingNotifier::new(),
            Duration::from_millis(1100),
            sleeper,
        );
        BatchScanner::new(processor)
    }

    #[tokio::test]
    async fn test_recovers_only_pending_rows_with_urls() {
        let store = Arc::new(MemoryRowStore::new());

        // Qualifies
        let pending = store
            .append(Row::new("https://example.com/1", ""))
            .await
            .unwrap();
        // Pending but no URL: skipped
        store.append(Row::new("", "")).await.unwrap();
        // Already delivered: skipped
        let sent = store
            .append(Row::new("https://example.com/2", ""))
            .await
            .unwrap();
        store.set_status(sent, Status::Sent).await.unwrap();
        // Failed: recovery is not retry
        let failed = store
            .append(Row::new("https://example.com/3", ""))
            .await
            .unwrap();
        store
            .set_status(failed, Status::Error("Fetch 500".to_string()))
            .await
            .unwrap();

        let sleeper = RecordingSleeper::new();
        let scanner = scanner(store.clone(), sleeper.clone());
        let report = scanner.scan_and_recover().await.unwrap();

        assert_eq!(report.scanned, 4);
        assert_eq!(report.recovered, 1);
        assert_eq!(store.get(pending).await.unwrap().unwrap().status, Status::Sent);
        assert_eq!(store.get(sent).await.unwrap().unwrap().status, Status::Sent);
        assert_eq!(
            store.get(failed).await.unwrap().unwrap().status,
            Status::Error("Fetch 500".to_string())
        );

        // One processed row, one pacing delay
        assert_eq!(sleeper.sleep_count(), 1);
    }

    #[tokio::test]
    async fn test_sequential_scan_paces_every_row() {
        let store = Arc::new(MemoryRowStore::new());
        for i in 0..3 {
            store
                .append(Row::new(format!("https://example.com/{}", i), ""))
                .await
                .unwrap();
        }

        let sleeper = RecordingSleeper::new();
        let scanner = scanner(store.clone(), sleeper.clone());
        let report = scanner.scan_and_recover().await.unwrap();

        assert_eq!(report.recovered, 3);
        assert!(sleeper.total_slept() >= 3 * Duration::from_millis(1100));
    }

    #[tokio::test]
    async fn test_empty_store_scan() {
        let store = Arc::new(MemoryRowStore::new());
        let scanner = scanner(store, RecordingSleeper::new());
        let report = scanner.scan_and_recover().await.unwrap();
        assert_eq!(report, ScanReport::default());
    }
}
