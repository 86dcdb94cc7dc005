//! Draftwire LLM Provider Layer
//!
//! Pluggable text-generation provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `draftwire-domain`:
//!
//! - `OpenAiProvider`: chat-completions API integration (bearer auth)
//! - `MockProvider`: deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use draftwire_llm::MockProvider;
//! use draftwire_domain::traits::LlmProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use draftwire_domain::traits::{LlmError, LlmProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub use openai::OpenAiProvider;

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Scripted results are consumed in order; once exhausted, the default
/// response is returned for every further call.
///
/// # Examples
///
/// ```
/// use draftwire_llm::MockProvider;
/// use draftwire_domain::traits::{LlmError, LlmProvider};
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::new("fallback");
/// provider.push_response("first");
/// provider.push_error(LlmError::Quota("requests per day".to_string()));
///
/// assert_eq!(provider.complete("p").await.unwrap(), "first");
/// assert!(matches!(provider.complete("p").await, Err(LlmError::Quota(_))));
/// assert_eq!(provider.complete("p").await.unwrap(), "fallback");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    scripted: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful response for the next unconsumed call
    pub fn push_response(&self, response: impl Into<String>) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue an error for the next unconsumed call
    pub fn push_error(&self, error: LlmError) {
        self.scripted.lock().unwrap().push_back(Err(error));
    }

    /// Number of completions requested so far
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// All prompts seen, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.scripted.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.default_response.clone()),
        }
    }
}
