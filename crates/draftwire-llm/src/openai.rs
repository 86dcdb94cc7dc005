//! OpenAI-compatible chat-completions provider
//!
//! Talks to any endpoint exposing the chat-completions shape:
//! bearer-token auth, JSON body `{model, messages, temperature,
//! max_tokens}`, response carrying either `error.message` or
//! `choices[0].message.content`.
//!
//! Quota exhaustion is recognized here, once, and surfaced as
//! `LlmError::Quota`; callers classify by variant rather than matching
//! message text themselves.

use async_trait::async_trait;
use draftwire_domain::traits::{LlmError, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat-completions endpoint
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default timeout for generation requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sampling temperature sent with every request
const TEMPERATURE: f64 = 0.7;

/// Completion length cap sent with every request
const MAX_TOKENS: u32 = 512;

/// Upstream error markers that mean the shared quota is exhausted
const QUOTA_MARKERS: [&str; 2] = ["quota", "insufficient_quota"];

/// Chat-completions API provider
pub struct OpenAiProvider {
    api_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    error: Option<ApiError>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenAiProvider {
    /// Create a new provider against the default endpoint
    ///
    /// # Parameters
    ///
    /// - `api_key`: bearer token for the generation API
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_url(DEFAULT_API_URL, api_key)
    }

    /// Create a provider against a specific endpoint
    ///
    /// Useful for OpenAI-compatible gateways and for test servers.
    pub fn with_api_url(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Set the model to use
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn classify_api_error(error: ApiError) -> LlmError {
        let code = error.code.unwrap_or_default();
        let is_quota = QUOTA_MARKERS
            .iter()
            .any(|marker| code.contains(marker) || error.message.contains(marker));
        if is_quota {
            LlmError::Quota(error.message)
        } else {
            LlmError::Upstream(error.message)
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a helpful assistant.".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "chat completion request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        // The API reports failures in the JSON body, sometimes alongside
        // a non-2xx status, so the body is decoded either way.
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(Self::classify_api_error(error));
        }

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("response had no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let provider = OpenAiProvider::new("sk-test");
        assert_eq!(provider.api_url, DEFAULT_API_URL);
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_with_model() {
        let provider = OpenAiProvider::new("sk-test").with_model("gpt-4o-mini");
        assert_eq!(provider.model, "gpt-4o-mini");
    }

    #[test]
    fn test_quota_classified_by_code() {
        let error = ApiError {
            message: "You exceeded your current plan".to_string(),
            code: Some("insufficient_quota".to_string()),
        };
        assert!(matches!(
            OpenAiProvider::classify_api_error(error),
            LlmError::Quota(_)
        ));
    }

    #[test]
    fn test_quota_classified_by_message() {
        let error = ApiError {
            message: "You exceeded your quota for this month".to_string(),
            code: None,
        };
        assert!(matches!(
            OpenAiProvider::classify_api_error(error),
            LlmError::Quota(_)
        ));
    }

    #[test]
    fn test_other_errors_stay_generic() {
        let error = ApiError {
            message: "The model is overloaded".to_string(),
            code: Some("server_error".to_string()),
        };
        assert!(matches!(
            OpenAiProvider::classify_api_error(error),
            LlmError::Upstream(_)
        ));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.error.is_none());
        assert_eq!(parsed.choices[0].message.content, "hello");

        let body = r#"{"error":{"message":"bad key","code":"invalid_api_key"}}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.unwrap().message, "bad key");
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Unroutable endpoint: the request fails before any response
        let provider =
            OpenAiProvider::with_api_url("http://127.0.0.1:1/v1/chat/completions", "sk-test");
        let result = provider.complete("test").await;
        assert!(matches!(result, Err(LlmError::Transport(_))));
    }
}
