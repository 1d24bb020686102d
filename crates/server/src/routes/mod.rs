pub mod chat;
pub mod health;
pub mod metrics;
pub mod system_prompt;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

/// Build the chat API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", get(chat::greeting).post(chat::chat))
        .route("/query", post(chat::query))
        .route(
            "/system-prompt",
            get(system_prompt::get).put(system_prompt::put),
        )
}
