pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/chat", post(handlers::handle_chat))
        .route(
            "/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/sessions/:id/transcript",
            get(handlers::handle_get_transcript),
        )
        .with_state(state)
}
