//! System prompt endpoints

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppError;

#[derive(Serialize, Deserialize)]
pub struct SystemPromptBody {
    system_prompt: String,
}

/// GET /system-prompt - Current system prompt of the agent session
pub async fn get(State(state): State<AppState>) -> Json<SystemPromptBody> {
    Json(SystemPromptBody {
        system_prompt: state.session.system_prompt().await,
    })
}

/// PUT /system-prompt - Replace the system prompt for subsequent chats
pub async fn put(
    State(state): State<AppState>,
    Json(body): Json<SystemPromptBody>,
) -> Result<Json<SystemPromptBody>, AppError> {
    state
        .session
        .set_system_prompt(body.system_prompt.clone())
        .await
        .map_err(AppError::BadRequest)?;

    tracing::info!(chars = body.system_prompt.chars().count(), "System prompt updated");
    Ok(Json(body))
}
