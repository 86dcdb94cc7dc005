//! Telegram Bot API notifier

use crate::approval_message;
use async_trait::async_trait;
use draftwire_domain::traits::ReviewNotifier;
use draftwire_domain::{CallbackToken, RowRef};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default Telegram Bot API base
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default timeout for bot API calls (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Per-recipient delivery error, logged and never propagated
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network-level failure before any response arrived
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response from the bot API
    #[error("bot API returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, for the log line
        body: String,
    },
}

/// Transport over the bot HTTP API
///
/// Injectable so per-recipient delivery behavior is testable without
/// a network.
#[async_trait]
pub trait BotTransport: Send + Sync {
    /// Post a JSON payload to a fully formed bot API URL
    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), DeliveryError>;
}

/// Production transport over reqwest
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl BotTransport for HttpTransport {
    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), DeliveryError> {
        let response = self.client.post(url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Telegram implementation of `ReviewNotifier`
///
/// Sends the approval message with an inline keyboard of approve and
/// reject buttons whose callback data carries the encoded row tokens.
pub struct TelegramNotifier<T: BotTransport = HttpTransport> {
    api_base: String,
    bot_token: String,
    chat_ids: Vec<String>,
    transport: T,
}

#[derive(Serialize)]
struct InlineKeyboard {
    inline_keyboard: Vec<Vec<InlineButton>>,
}

#[derive(Serialize)]
struct InlineButton {
    text: &'static str,
    callback_data: String,
}

fn keyboard(row: RowRef) -> InlineKeyboard {
    InlineKeyboard {
        inline_keyboard: vec![vec![
            InlineButton {
                text: "✅ Approve",
                callback_data: CallbackToken::Approve(row).encode(),
            },
            InlineButton {
                text: "❌ Reject",
                callback_data: CallbackToken::Reject(row).encode(),
            },
        ]],
    }
}

impl TelegramNotifier {
    /// Create a notifier for a bot token and reviewer chat set
    pub fn new(bot_token: impl Into<String>, chat_ids: Vec<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, bot_token, chat_ids)
    }

    /// Create a notifier against a specific API base (for tests)
    pub fn with_api_base(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_ids: Vec<String>,
    ) -> Self {
        Self::with_transport(api_base, bot_token, chat_ids, HttpTransport::new())
    }
}

impl<T: BotTransport> TelegramNotifier<T> {
    /// Create a notifier with an injected transport (for tests)
    pub fn with_transport(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_ids: Vec<String>,
        transport: T,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_ids,
            transport,
        }
    }

    /// The configured reviewer chat identifiers, in delivery order
    pub fn chat_ids(&self) -> &[String] {
        &self.chat_ids
    }

    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<(), DeliveryError> {
        let url = format!("{}/bot{}/{}", self.api_base, self.bot_token, method);
        self.transport.post(&url, &payload).await
    }
}

#[async_trait]
impl<T: BotTransport> ReviewNotifier for TelegramNotifier<T> {
    async fn broadcast(&self, row: RowRef, url: &str, summary: &str, post: &str) {
        let text = approval_message(row, url, summary, post);
        // reply_markup travels as a serialized keyboard structure
        let reply_markup = serde_json::to_string(&keyboard(row)).unwrap_or_default();

        for chat_id in &self.chat_ids {
            let payload = json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
                "reply_markup": reply_markup,
            });

            match self.call("sendMessage", payload).await {
                Ok(()) => debug!(row, chat_id = %chat_id, "approval request delivered"),
                // One failed recipient must not block the rest
                Err(e) => warn!(row, chat_id = %chat_id, error = %e, "delivery failed"),
            }
        }
    }

    async fn answer_callback(&self, callback_id: &str, text: &str) {
        let payload = json!({
            "callback_query_id": callback_id,
            "text": text,
            "show_alert": false,
        });

        if let Err(e) = self.call("answerCallbackQuery", payload).await {
            warn!(callback_id = %callback_id, error = %e, "callback acknowledgment failed");
        }
    }
}
