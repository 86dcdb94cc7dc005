//! Outbound call pacing
//!
//! The generation API quota is shared across all rows, so every row
//! invocation ends with a fixed pacing delay regardless of outcome.
//! The delay is a plain sleep, not a token bucket: it paces sequential
//! calls within one execution context and offers no cross-process
//! coordination, which matches the single-threaded trigger model.

use async_trait::async_trait;
use std::time::Duration;

/// Clock seam for the pacing delay
///
/// Production uses [`TokioSleeper`]; tests inject a recording fake so
/// pacing is asserted without wall-clock waits.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for the given duration
    async fn sleep(&self, duration: Duration);
}

/// `Sleeper` backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Enforces a minimum wall-clock interval between outbound calls
pub struct Pacer<S: Sleeper = TokioSleeper> {
    interval: Duration,
    sleeper: S,
}

impl Pacer<TokioSleeper> {
    /// Create a pacer over the tokio timer
    pub fn new(interval: Duration) -> Self {
        Self::with_sleeper(interval, TokioSleeper)
    }
}

impl<S: Sleeper> Pacer<S> {
    /// Create a pacer over a custom sleeper
    pub fn with_sleeper(interval: Duration, sleeper: S) -> Self {
        Self { interval, sleeper }
    }

    /// The configured pacing interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait out one pacing interval
    pub async fn pace(&self) {
        self.sleeper.sleep(self.interval).await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Sleeper that records requested durations instead of waiting
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSleeper {
        slept: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingSleeper {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn total_slept(&self) -> Duration {
            self.slept.lock().unwrap().iter().sum()
        }

        pub fn sleep_count(&self) -> usize {
            self.slept.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }
}
