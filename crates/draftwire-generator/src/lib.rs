//! Draftwire Draft Generation
//!
//! Turns extracted article text into a `{summary, post}` draft:
//! builds the generation prompt, calls the configured `LlmProvider`,
//! and parses the raw completion through a two-stage
//! (structured/heuristic) parser that tolerates non-conforming model
//! output.
//!
//! # Examples
//!
//! ```
//! use draftwire_generator::Generator;
//! use draftwire_llm::MockProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new(r#"{"summary": "- a", "post": "p #w #x #y #z"}"#);
//! let generator = Generator::new(provider);
//! let draft = generator.generate("article text", "witty").await.unwrap();
//! assert_eq!(draft.post, "p #w #x #y #z");
//! # });
//! ```

#![warn(missing_docs)]

pub mod parser;
pub mod prompt;

use draftwire_domain::traits::{LlmError, LlmProvider};
use draftwire_domain::Draft;
use tracing::debug;

pub use parser::parse_draft;
pub use prompt::PromptBuilder;

/// Generates post drafts from article text via an LLM provider
pub struct Generator<L: LlmProvider> {
    provider: L,
}

impl<L: LlmProvider> Generator<L> {
    /// Create a generator over a provider
    pub fn new(provider: L) -> Self {
        Self { provider }
    }

    /// Generate a draft for article text in the given tone
    ///
    /// Fails only when the provider fails; any textual output, however
    /// malformed, still yields a draft through the fallback parser.
    pub async fn generate(&self, text: &str, tone: &str) -> Result<Draft, LlmError> {
        let prompt = PromptBuilder::new(text, tone).build();
        debug!(prompt_chars = prompt.len(), tone = %tone, "generating draft");

        let content = self.provider.complete(&prompt).await?;
        debug!(content_chars = content.len(), "completion received");

        Ok(parse_draft(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftwire_llm::MockProvider;

    #[tokio::test]
    async fn test_generate_structured_output() {
        let provider = MockProvider::new(
            r#"{"summary": "- one\n- two\n- three\n- four", "post": "Go read it. #a #b #c #d"}"#,
        );
        let generator = Generator::new(provider);

        let draft = generator.generate("article", "witty").await.unwrap();
        assert_eq!(draft.summary, "- one\n- two\n- three\n- four");
        assert_eq!(draft.post, "Go read it. #a #b #c #d");
    }

    #[tokio::test]
    async fn test_generate_fenced_output() {
        let provider = MockProvider::new(
            "```json\n{\"summary\": \"S\", \"post\": \"P\"}\n```",
        );
        let generator = Generator::new(provider);

        let draft = generator.generate("article", "casual").await.unwrap();
        assert_eq!(draft.summary, "S");
        assert_eq!(draft.post, "P");
    }

    #[tokio::test]
    async fn test_generate_prose_output_degrades() {
        let provider = MockProvider::new("Summary: the gist\nPost: the post");
        let generator = Generator::new(provider);

        let draft = generator.generate("article", "casual").await.unwrap();
        assert_eq!(draft.summary, "the gist");
        assert_eq!(draft.post, "the post");
    }

    #[tokio::test]
    async fn test_generate_propagates_provider_errors() {
        let provider = MockProvider::default();
        provider.push_error(LlmError::Quota("insufficient_quota".to_string()));
        let generator = Generator::new(provider);

        let result = generator.generate("article", "casual").await;
        assert!(matches!(result, Err(LlmError::Quota(_))));
    }

    #[tokio::test]
    async fn test_prompt_carries_tone_and_text() {
        let provider = MockProvider::new(r#"{"summary": "S", "post": "P"}"#);
        let generator = Generator::new(provider.clone());

        generator.generate("the article body", "data-driven").await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("**data-driven**"));
        assert!(prompts[0].contains("the article body"));
    }
}
