use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::CompletionProvider;
use crate::search_client::SearchProvider;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both providers sit behind trait objects so the pipeline can be exercised
/// with test doubles instead of process-wide client state.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: Arc<dyn CompletionProvider>,
    pub search: Arc<dyn SearchProvider>,
    pub config: Config,
}
