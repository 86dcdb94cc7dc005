//! In-memory notifier double for tests

use async_trait::async_trait;
use draftwire_domain::traits::ReviewNotifier;
use draftwire_domain::RowRef;
use std::sync::{Arc, Mutex};

/// A broadcast observed by the recording notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBroadcast {
    /// Row the draft belongs to
    pub row: RowRef,
    /// Article URL included in the message
    pub url: String,
    /// Summary included in the message
    pub summary: String,
    /// Post included in the message
    pub post: String,
}

/// Notifier double that records every call instead of delivering
///
/// Clones share state, so a test can hand one clone to the pipeline
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    broadcasts: Arc<Mutex<Vec<RecordedBroadcast>>>,
    acks: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    /// Create an empty recording notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// All broadcasts observed so far, in call order
    pub fn broadcasts(&self) -> Vec<RecordedBroadcast> {
        self.broadcasts.lock().unwrap().clone()
    }

    /// All callback acknowledgments observed so far as
    /// `(callback_id, text)` pairs
    pub fn acks(&self) -> Vec<(String, String)> {
        self.acks.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewNotifier for RecordingNotifier {
    async fn broadcast(&self, row: RowRef, url: &str, summary: &str, post: &str) {
        self.broadcasts.lock().unwrap().push(RecordedBroadcast {
            row,
            url: url.to_string(),
            summary: summary.to_string(),
            post: post.to_string(),
        });
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) {
        self.acks
            .lock()
            .unwrap()
            .push((callback_id.to_string(), text.to_string()));
    }
}
