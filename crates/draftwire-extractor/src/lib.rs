//! Draftwire Article Extraction
//!
//! Fetches a submitted article URL and turns the HTML body into
//! normalized plain text, bounded in length so downstream prompt size
//! and cost stay predictable.
//!
//! # Behavior
//!
//! - HTTP GET following redirects; any non-2xx response is a
//!   `FetchError::Status`
//! - Script and style blocks are removed, remaining markup stripped,
//!   entities and whitespace collapsed
//! - Output is trimmed and silently truncated to
//!   [`MAX_TEXT_CHARS`] characters; partial content is acceptable
//!   generator input

#![warn(missing_docs)]

pub mod html;

use async_trait::async_trait;
use draftwire_domain::traits::{ArticleSource, FetchError};
use std::time::Duration;
use tracing::{debug, warn};

pub use html::{html_to_text, MAX_TEXT_CHARS};

/// Default timeout for article fetches (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP-backed implementation of `ArticleSource`
///
/// # Examples
///
/// ```no_run
/// use draftwire_extractor::HttpArticleSource;
/// use draftwire_domain::traits::ArticleSource;
///
/// # tokio_test::block_on(async {
/// let source = HttpArticleSource::new();
/// let text = source.fetch_text("https://example.com/article").await.unwrap();
/// assert!(text.len() <= draftwire_extractor::MAX_TEXT_CHARS);
/// # });
/// ```
pub struct HttpArticleSource {
    client: reqwest::Client,
    user_agent: String,
}

impl Default for HttpArticleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpArticleSource {
    /// Create a source with default settings (redirects followed)
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            client,
            user_agent: "Draftwire/0.1".to_string(),
        }
    }

    /// Set a custom user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url = %url, "article fetch starting");

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "article fetch failed");
                FetchError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let text = html_to_text(&body);
        debug!(url = %url, chars = text.len(), "article text extracted");
        Ok(text)
    }
}
