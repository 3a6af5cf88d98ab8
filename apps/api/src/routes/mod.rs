pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::outreach::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/generate", post(handlers::handle_generate))
        .route("/api/get-prompt", get(handlers::handle_get_prompt))
        .route("/api/update-prompt", post(handlers::handle_update_prompt))
        .route(
            "/api/provider",
            get(handlers::handle_get_provider).post(handlers::handle_set_provider),
        )
        .with_state(state)
}
