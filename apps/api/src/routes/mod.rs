pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::drafts::handlers as draft_handlers;
use crate::generation::handlers as generation_handlers;
use crate::state::AppState;
use crate::styles::handlers as style_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Style analysis & profiles
        .route(
            "/api/analyze-style",
            post(style_handlers::handle_analyze_style),
        )
        .route("/api/styles", get(style_handlers::handle_list_styles))
        .route(
            "/api/styles/:style_id",
            delete(style_handlers::handle_delete_style),
        )
        // Draft generation
        .route(
            "/api/generate-post",
            post(generation_handlers::handle_generate_post),
        )
        // Saved drafts
        .route(
            "/api/drafts",
            post(draft_handlers::handle_save_draft).get(draft_handlers::handle_list_drafts),
        )
        .route(
            "/api/drafts/:draft_id",
            delete(draft_handlers::handle_delete_draft),
        )
        .with_state(state)
}
