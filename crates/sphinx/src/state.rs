//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::feedback::{CsvExporter, FeedbackQueryEngine, FeedbackStore};
use crate::pages::Pages;
use crate::riddle::RiddleBank;
use crate::session_token::SessionSigner;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Static riddle catalog
    pub bank: Arc<RiddleBank>,

    /// Session cookie signer
    pub signer: Arc<SessionSigner>,

    /// Feedback table (writes)
    pub store: FeedbackStore,

    /// Feedback listing
    pub queries: FeedbackQueryEngine,

    /// Feedback CSV export
    pub exporter: CsvExporter,

    /// Bodies for the gated entry point
    pub pages: Arc<Pages>,
}

impl AppState {
    /// Create application state, opening the feedback database
    pub async fn new(config: AppConfig) -> Result<Self> {
        let path = config.database_path.clone();
        let store = tokio::task::spawn_blocking(move || FeedbackStore::open(path))
            .await
            .context("Database open task failed")?
            .context("Failed to open feedback database")?;

        let pages = Pages::load(&config.public_dir);

        Ok(Self::with_parts(config, RiddleBank::builtin(), store, pages))
    }

    /// Assemble state from already-built parts
    pub fn with_parts(config: AppConfig, bank: RiddleBank, store: FeedbackStore, pages: Pages) -> Self {
        let signer = Arc::new(SessionSigner::new(&config.session));

        Self {
            queries: FeedbackQueryEngine::new(store.clone()),
            exporter: CsvExporter::new(store.clone()),
            config,
            bank: Arc::new(bank),
            signer,
            store,
            pages: Arc::new(pages),
        }
    }
}
