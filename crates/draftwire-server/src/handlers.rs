//! HTTP request handlers for the Draftwire server.
//!
//! Implements the approval webhook, row submission, and health check
//! endpoints using axum.

use crate::SharedProcessor;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use draftwire_domain::traits::{ReviewNotifier, RowStore, StoreError};
use draftwire_domain::{CallbackToken, Row, RowRef, Status};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Row store shared with the pipeline
    pub store: Arc<dyn RowStore>,
    /// Notifier used to acknowledge review decisions
    pub notifier: Arc<dyn ReviewNotifier>,
    /// Processor run for newly submitted rows
    pub processor: Arc<SharedProcessor>,
    /// Shared secret expected in the webhook query string
    pub webhook_secret: Option<String>,
}

/// Row submission request
#[derive(Debug, Deserialize)]
pub struct SubmitRowRequest {
    /// Article URL to draft a post for
    pub url: String,
    /// Requested tone; blank falls back to the default
    #[serde(default)]
    pub tone: String,
}

/// Row submission response
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitRowResponse {
    /// Reference of the appended row
    pub row: RowRef,
    /// Initial status cell value
    pub status: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Total number of rows in the store
    pub row_count: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request was malformed
    BadRequest(String),
    /// Store-related error
    Store(StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

/// Webhook query parameters
#[derive(Debug, Deserialize)]
pub struct WebhookParams {
    /// Shared secret passed by the messaging platform
    #[serde(rename = "tgSecret", default)]
    tg_secret: Option<String>,
}

/// Incoming update, reduced to the fields the webhook acts on
#[derive(Debug, Default, Deserialize)]
struct WebhookUpdate {
    callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    #[serde(default)]
    id: String,
    #[serde(default)]
    data: Option<String>,
}

/// POST /webhook - Record a review decision
///
/// Always answers with a plain-text body. Requests with a wrong or
/// missing secret get "unauthorized"; everything else gets "ok" so the
/// messaging platform never retries, whether or not a decision was
/// recorded.
async fn approval_webhook(
    State(state): State<AppState>,
    Query(params): Query<WebhookParams>,
    body: Bytes,
) -> &'static str {
    if let Some(expected) = &state.webhook_secret {
        if params.tg_secret.as_deref() != Some(expected.as_str()) {
            warn!("webhook request rejected: bad or missing secret");
            return "unauthorized";
        }
    }

    let update: WebhookUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "ignoring malformed webhook body");
            return "ok";
        }
    };

    let Some(callback) = update.callback_query else {
        return "ok";
    };
    let Some(data) = callback.data.as_deref() else {
        return "ok";
    };
    let Some(token) = CallbackToken::decode(data) else {
        debug!(data, "ignoring unrecognized callback data");
        return "ok";
    };

    let row = token.row();
    let (decision, ack) = match token {
        CallbackToken::Approve(_) => (Status::Approved, "Approved"),
        CallbackToken::Reject(_) => (Status::Rejected, "Rejected"),
    };

    match state.store.set_status_if(row, &Status::Sent, decision).await {
        Ok(true) => {
            info!(row, decision = ack, "review decision recorded");
            if !callback.id.is_empty() {
                state.notifier.answer_callback(&callback.id, ack).await;
            }
        }
        Ok(false) => {
            warn!(row, "decision ignored: row is not awaiting review");
            // Still clear the reviewer's pending indicator
            if !callback.id.is_empty() {
                state
                    .notifier
                    .answer_callback(&callback.id, "Already decided")
                    .await;
            }
        }
        Err(StoreError::NotFound(_)) => {
            warn!(row, "decision ignored: row not found");
        }
        Err(e) => {
            error!(row, error = %e, "failed to record review decision");
        }
    }

    "ok"
}

/// POST /rows - Submit a URL for drafting
///
/// Appends a pending row and processes it in the background. Returns
/// 202 immediately; the draft lands in the store once processing
/// finishes.
async fn submit_row(
    State(state): State<AppState>,
    Json(request): Json<SubmitRowRequest>,
) -> Result<(StatusCode, Json<SubmitRowResponse>), AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::BadRequest("url must not be empty".to_string()));
    }

    let row = state
        .store
        .append(Row::new(request.url, request.tone))
        .await?;
    info!(row, "row submitted");

    let processor = state.processor.clone();
    tokio::spawn(async move {
        claim_and_process(&processor, row).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitRowResponse {
            row,
            status: Status::Pending.as_cell(),
        }),
    ))
}

/// Claim a submitted row and process it
///
/// The recovery scan claims pending rows the same way, so whichever
/// side wins the `Pending -> Running` compare-and-set processes the
/// row exactly once; the loser backs off.
async fn claim_and_process(processor: &SharedProcessor, row: RowRef) {
    match processor
        .store()
        .set_status_if(row, &Status::Pending, Status::Running)
        .await
    {
        Ok(true) => {
            if let Err(e) = processor.process(row).await {
                error!(row, error = %e, "failed to process submitted row");
            }
        }
        Ok(false) => {
            debug!(row, "row already claimed, skipping");
        }
        Err(e) => {
            error!(row, error = %e, "failed to claim submitted row");
        }
    }
}

/// GET /health - Liveness and store reachability check
async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthCheckResponse>, AppError> {
    let rows = state.store.all().await?;

    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        row_count: rows.len(),
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/webhook", post(approval_webhook))
        .route("/rows", post(submit_row))
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use draftwire_domain::traits::{ArticleSource, FetchError, LlmProvider};
    use draftwire_generator::Generator;
    use draftwire_llm::MockProvider;
    use draftwire_notifier::RecordingNotifier;
    use draftwire_pipeline::RowProcessor;
    use draftwire_store::MemoryRowStore;
    use std::time::Duration;
    use tower::ServiceExt; // for oneshot

    struct StubSource;

    #[async_trait]
    impl ArticleSource for StubSource {
        async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
            Ok("article text".to_string())
        }
    }

    fn create_test_state() -> (AppState, Arc<MemoryRowStore>, RecordingNotifier) {
        let store = Arc::new(MemoryRowStore::new());
        let notifier = RecordingNotifier::new();

        let shared_store: Arc<dyn RowStore> = store.clone();
        let shared_source: Arc<dyn ArticleSource> = Arc::new(StubSource);
        let shared_provider: Arc<dyn LlmProvider> =
            Arc::new(MockProvider::new(r#"{"summary": "s", "post": "p"}"#));
        let shared_notifier: Arc<dyn ReviewNotifier> = Arc::new(notifier.clone());

        let processor = Arc::new(RowProcessor::new(
            shared_store.clone(),
            shared_source,
            Generator::new(shared_provider),
            shared_notifier.clone(),
            Duration::from_millis(1),
        ));

        let state = AppState {
            store: shared_store,
            notifier: shared_notifier,
            processor,
            webhook_secret: Some("hook-secret".to_string()),
        };

        (state, store, notifier)
    }

    fn webhook_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_webhook_rejects_bad_secret() {
        let (state, store, _) = create_test_state();
        store.append(sent_row()).await.unwrap();
        let app = create_router(state);

        let request = webhook_request(
            "/webhook?tgSecret=wrong",
            r#"{"callback_query": {"id": "cb1", "data": "approve_1"}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "unauthorized");
        let row = store.get(1).await.unwrap().unwrap();
        assert_eq!(row.status, Status::Sent);
    }

    #[tokio::test]
    async fn test_webhook_without_callback_query_is_ok() {
        let (state, _, notifier) = create_test_state();
        let app = create_router(state);

        let request = webhook_request(
            "/webhook?tgSecret=hook-secret",
            r#"{"message": {"text": "hello"}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "ok");
        assert!(notifier.acks().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_records_approval() {
        let (state, store, notifier) = create_test_state();
        store.append(sent_row()).await.unwrap();
        let app = create_router(state);

        let request = webhook_request(
            "/webhook?tgSecret=hook-secret",
            r#"{"callback_query": {"id": "cb1", "data": "approve_1"}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "ok");
        let row = store.get(1).await.unwrap().unwrap();
        assert_eq!(row.status, Status::Approved);
        assert_eq!(
            notifier.acks(),
            vec![("cb1".to_string(), "Approved".to_string())]
        );
    }

    #[tokio::test]
    async fn test_webhook_records_rejection() {
        let (state, store, notifier) = create_test_state();
        store.append(sent_row()).await.unwrap();
        let app = create_router(state);

        let request = webhook_request(
            "/webhook?tgSecret=hook-secret",
            r#"{"callback_query": {"id": "cb2", "data": "reject_1"}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "ok");
        let row = store.get(1).await.unwrap().unwrap();
        assert_eq!(row.status, Status::Rejected);
        assert_eq!(
            notifier.acks(),
            vec![("cb2".to_string(), "Rejected".to_string())]
        );
    }

    #[tokio::test]
    async fn test_webhook_ignores_stale_decision() {
        let (state, store, notifier) = create_test_state();
        let mut row = sent_row();
        row.status = Status::Approved;
        store.append(row).await.unwrap();
        let app = create_router(state);

        let request = webhook_request(
            "/webhook?tgSecret=hook-secret",
            r#"{"callback_query": {"id": "cb3", "data": "reject_1"}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "ok");
        let row = store.get(1).await.unwrap().unwrap();
        assert_eq!(row.status, Status::Approved);
        // The reviewer's client still gets its indicator cleared
        assert_eq!(
            notifier.acks(),
            vec![("cb3".to_string(), "Already decided".to_string())]
        );
    }

    #[tokio::test]
    async fn test_webhook_ignores_unknown_row() {
        let (state, _, notifier) = create_test_state();
        let app = create_router(state);

        let request = webhook_request(
            "/webhook?tgSecret=hook-secret",
            r#"{"callback_query": {"id": "cb4", "data": "approve_99"}}"#,
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "ok");
        assert!(notifier.acks().is_empty());
    }

    #[tokio::test]
    async fn test_submit_row_appends_pending() {
        let (state, store, _) = create_test_state();
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/rows")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"url": "https://example.com/article", "tone": "witty"}"#,
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body: SubmitRowResponse =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.row, 1);
        assert_eq!(body.status, "Pending");

        let row = store.get(1).await.unwrap().unwrap();
        assert_eq!(row.url, "https://example.com/article");
        assert_eq!(row.tone, "witty");
    }

    #[tokio::test]
    async fn test_submission_task_skips_row_claimed_by_scan() {
        let store = Arc::new(MemoryRowStore::new());
        let provider = MockProvider::new(r#"{"summary": "s", "post": "p"}"#);
        let notifier = RecordingNotifier::new();

        let shared_store: Arc<dyn RowStore> = store.clone();
        let processor: crate::SharedProcessor = RowProcessor::new(
            shared_store.clone(),
            Arc::new(StubSource) as Arc<dyn ArticleSource>,
            Generator::new(Arc::new(provider.clone()) as Arc<dyn LlmProvider>),
            Arc::new(notifier.clone()) as Arc<dyn ReviewNotifier>,
            Duration::from_millis(1),
        );

        let row = store
            .append(Row::new("https://example.com/a", ""))
            .await
            .unwrap();

        // The recovery scan wins the claim and completes the row first.
        assert!(store
            .set_status_if(row, &Status::Pending, Status::Running)
            .await
            .unwrap());
        processor.process(row).await.unwrap();
        assert_eq!(provider.call_count(), 1);

        // The submission-triggered task finds its claim lost and backs off.
        claim_and_process(&processor, row).await;

        assert_eq!(provider.call_count(), 1);
        assert_eq!(notifier.broadcasts().len(), 1);
        let stored = store.get(row).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::Sent);
    }

    #[tokio::test]
    async fn test_submission_task_processes_unclaimed_row() {
        let store = Arc::new(MemoryRowStore::new());
        let provider = MockProvider::new(r#"{"summary": "s", "post": "p"}"#);
        let notifier = RecordingNotifier::new();

        let shared_store: Arc<dyn RowStore> = store.clone();
        let processor: crate::SharedProcessor = RowProcessor::new(
            shared_store.clone(),
            Arc::new(StubSource) as Arc<dyn ArticleSource>,
            Generator::new(Arc::new(provider.clone()) as Arc<dyn LlmProvider>),
            Arc::new(notifier.clone()) as Arc<dyn ReviewNotifier>,
            Duration::from_millis(1),
        );

        let row = store
            .append(Row::new("https://example.com/a", ""))
            .await
            .unwrap();

        claim_and_process(&processor, row).await;

        assert_eq!(provider.call_count(), 1);
        let stored = store.get(row).await.unwrap().unwrap();
        assert_eq!(stored.status, Status::Sent);
    }

    #[tokio::test]
    async fn test_submit_row_rejects_blank_url() {
        let (state, _, _) = create_test_state();
        let app = create_router(state);

        let request = Request::builder()
            .method("POST")
            .uri("/rows")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"url": "   "}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (state, store, _) = create_test_state();
        store.append(sent_row()).await.unwrap();
        let app = create_router(state);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: HealthCheckResponse =
            serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.row_count, 1);
    }

    fn sent_row() -> Row {
        let mut row = Row::new("https://example.com/a", "");
        row.status = Status::Sent;
        row
    }
}
