//! Row module - the unit of work

use crate::status::Status;

/// Default tone applied when the submitted tone cell is blank
pub const DEFAULT_TONE: &str = "professional and serious";

/// Stable reference to a row in the store (1-based index)
pub type RowRef = u64;

/// One unit of work: a submitted URL and its generated draft
///
/// Columns are fixed in the order URL, Tone, Summary, Post, Status.
/// `url` is immutable once set; `summary`/`post` are written exactly
/// once per successful generation and overwritten only by a later
/// successful generation for the same row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Submitted article URL
    pub url: String,

    /// Requested tone for the post (blank means the default tone)
    pub tone: String,

    /// Generated summary bullet points
    pub summary: String,

    /// Generated post draft
    pub post: String,

    /// Lifecycle status
    pub status: Status,
}

impl Row {
    /// Create a new pending row for a submitted URL
    pub fn new(url: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tone: tone.into(),
            summary: String::new(),
            post: String::new(),
            status: Status::Pending,
        }
    }

    /// The effective tone: the submitted tone lowercased, or the
    /// default when blank
    pub fn effective_tone(&self) -> String {
        let trimmed = self.tone.trim();
        if trimmed.is_empty() {
            DEFAULT_TONE.to_string()
        } else {
            trimmed.to_lowercase()
        }
    }
}
