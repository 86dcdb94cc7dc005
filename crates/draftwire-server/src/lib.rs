//! Draftwire server
//!
//! Wires the processing pipeline to its production adapters and serves
//! the approval webhook, row submission, and health check endpoints.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::AppConfig;
use draftwire_domain::traits::{ArticleSource, LlmProvider, ReviewNotifier, RowStore, StoreError};
use draftwire_extractor::HttpArticleSource;
use draftwire_generator::Generator;
use draftwire_llm::OpenAiProvider;
use draftwire_notifier::TelegramNotifier;
use draftwire_pipeline::{BatchScanner, RowProcessor, ScanWorker};
use draftwire_store::{MemoryRowStore, SqliteRowStore};
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Processor over the shared production adapters
pub type SharedProcessor = RowProcessor<
    Arc<dyn RowStore>,
    Arc<dyn ArticleSource>,
    Arc<dyn LlmProvider>,
    Arc<dyn ReviewNotifier>,
>;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Store initialization error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

fn build_processor(
    config: &AppConfig,
    store: Arc<dyn RowStore>,
    source: Arc<dyn ArticleSource>,
    provider: Arc<dyn LlmProvider>,
    notifier: Arc<dyn ReviewNotifier>,
) -> SharedProcessor {
    RowProcessor::new(
        store,
        source,
        Generator::new(provider),
        notifier,
        config.pipeline.rate_limit(),
    )
}

/// Start the Draftwire HTTP server
///
/// Builds the production adapters from configuration, spawns the
/// background recovery scan, and serves the axum router.
pub async fn start_server(config: AppConfig) -> Result<(), ServerError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Draftwire server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {}", config.openai_model);
    info!("Reviewer chats: {}", config.telegram_chat_ids.len());

    let store: Arc<dyn RowStore> = match &config.db_path {
        Some(path) => {
            info!("Using SQLite store at {}", path);
            Arc::new(SqliteRowStore::new(path)?)
        }
        None => {
            info!("Using in-memory store");
            Arc::new(MemoryRowStore::new())
        }
    };

    let source: Arc<dyn ArticleSource> = Arc::new(HttpArticleSource::new());
    let provider: Arc<dyn LlmProvider> = Arc::new(
        OpenAiProvider::with_api_url(&config.openai_api_url, &config.openai_api_key)
            .with_model(&config.openai_model),
    );
    let notifier: Arc<dyn ReviewNotifier> = Arc::new(TelegramNotifier::new(
        &config.telegram_bot_token,
        config.telegram_chat_ids.clone(),
    ));

    // One processor serves submissions; a second one, over the same
    // shared adapters, drives the periodic recovery scan.
    let processor = Arc::new(build_processor(
        &config,
        store.clone(),
        source.clone(),
        provider.clone(),
        notifier.clone(),
    ));
    let scan_processor = build_processor(
        &config,
        store.clone(),
        source.clone(),
        provider.clone(),
        notifier.clone(),
    );

    let worker = ScanWorker::new(
        BatchScanner::new(scan_processor),
        config.pipeline.scan_interval(),
    );
    tokio::spawn(async move {
        if let Err(e) = worker.run().await {
            error!(error = %e, "recovery scan worker stopped");
        }
    });

    let state = AppState {
        store,
        notifier,
        processor,
        webhook_secret: config.webhook_secret.clone(),
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
