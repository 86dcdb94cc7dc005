//! Draft module - generated output for a row

use serde::Deserialize;

/// The generated `{summary, post}` pair for one row
///
/// Deserializes directly from the generation API's structured output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Draft {
    /// Summary bullet points
    pub summary: String,

    /// Post text ending in hashtags
    pub post: String,
}

impl Draft {
    /// Create a draft from its two parts
    pub fn new(summary: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            post: post.into(),
        }
    }
}
