//! Background worker for the scheduled recovery scan

use crate::error::PipelineError;
use crate::pacing::Sleeper;
use crate::scanner::BatchScanner;
use draftwire_domain::traits::{ArticleSource, LlmProvider, ReviewNotifier, RowStore};
use tokio::time::{interval, Duration};

/// Runs the recovery scan on a schedule
///
/// The worker ticks at the configured interval and runs
/// `scan_and_recover` each time, until a shutdown signal (Ctrl+C) is
/// received. A failed scan is logged and the loop continues; one bad
/// cycle must not stop recovery.
pub struct ScanWorker<St, A, L, N, S>
where
    St: RowStore,
    A: ArticleSource,
    L: LlmProvider,
    N: ReviewNotifier,
    S: Sleeper,
{
    scanner: BatchScanner<St, A, L, N, S>,
    interval: Duration,
}

impl<St, A, L, N, S> ScanWorker<St, A, L, N, S>
where
    St: RowStore,
    A: ArticleSource,
    L: LlmProvider,
    N: ReviewNotifier,
    S: Sleeper,
{
    /// Create a worker ticking at the given interval
    pub fn new(scanner: BatchScanner<St, A, L, N, S>, interval: Duration) -> Self {
        Self { scanner, interval }
    }

    /// Run the worker until shutdown
    pub async fn run(&self) -> Result<(), PipelineError> {
        let mut ticker = interval(self.interval);

        tracing::info!("scan worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("starting recovery scan");
                    match self.scanner.scan_and_recover().await {
                        Ok(report) => {
                            tracing::info!(
                                scanned = report.scanned,
                                recovered = report.recovered,
                                "scan cycle complete"
                            );
                        }
                        Err(e) => {
                            tracing::error!("scan cycle failed: {}", e);
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received, stopping scan worker");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run for a specific number of cycles (useful for testing)
    pub async fn run_cycles(&self, cycles: usize) -> Result<(), PipelineError> {
        let mut ticker = interval(self.interval);
        for _ in 0..cycles {
            ticker.tick().await;
            self.scanner.scan_and_recover().await?;
        }
        Ok(())
    }
}
