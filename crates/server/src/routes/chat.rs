//! Chat and raw-query endpoints
//!
//! Both collect the render events emitted while the request runs and return
//! them next to the text meant for the model, so a UI can show the table,
//! flattened and JSON views of every query.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::AppState;
use crate::ai::session::GREETING;
use crate::error::AppError;
use crate::query::{RenderEvent, RenderPayload};

/// Request body for chat
#[derive(Deserialize)]
pub struct ChatRequest {
    message: String,
}

/// Response body for chat
#[derive(Serialize)]
pub struct ChatResponse {
    response: String,
    renders: Vec<RenderPayload>,
}

/// Response body for a chat turn that failed after it started.
///
/// Queries that already ran are still shown to the user.
#[derive(Serialize)]
pub struct ChatFailure {
    error: String,
    renders: Vec<RenderPayload>,
}

/// Request body for a raw query
#[derive(Deserialize)]
pub struct QueryRequest {
    query: String,
}

/// Response body for a raw query
#[derive(Serialize)]
pub struct QueryResponse {
    /// Exactly what the model would receive from the tool
    result: String,
    renders: Vec<RenderPayload>,
}

/// Response body for the greeting
#[derive(Serialize)]
pub struct GreetingResponse {
    greeting: &'static str,
}

/// POST /chat — AI chatbot with the FHIR query tool
///
/// Runs an agentic loop: Claude calls `query_fhir` as often as it needs
/// before composing a natural language answer. If the turn fails part way,
/// the renders of the queries that did run are returned with a 502.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Response, AppError> {
    let client = state
        .claude
        .as_ref()
        .ok_or_else(|| AppError::Internal("ANTHROPIC_API_KEY not configured".to_string()))?;

    if body.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty".to_string()));
    }

    tracing::info!(user_message = &body.message, model = client.model(), "Chat request");

    let (tx, rx) = mpsc::unbounded_channel::<RenderEvent>();
    let system_prompt = state.session.system_prompt().await;
    let outcome =
        crate::ai::chatbot::chat(client, &state.tool, &tx, &system_prompt, &body.message).await;
    let renders = drain(tx, rx);

    match outcome {
        Ok(response) => Ok(Json(ChatResponse { response, renders }).into_response()),
        Err(e) => {
            tracing::error!(error = %e, renders = renders.len(), "Chat failed");
            Ok((
                StatusCode::BAD_GATEWAY,
                Json(ChatFailure {
                    error: format!("Chat failed: {}", e),
                    renders,
                }),
            )
                .into_response())
        }
    }
}

/// POST /query — run the FHIR tool directly, without the model
pub async fn query(
    State(state): State<AppState>,
    Json(body): Json<QueryRequest>,
) -> Json<QueryResponse> {
    tracing::info!(query = &body.query, "Raw query request");

    let (tx, rx) = mpsc::unbounded_channel::<RenderEvent>();
    let result = state.tool.run_query(&body.query, &tx).await;

    Json(QueryResponse {
        result,
        renders: drain(tx, rx),
    })
}

/// GET /chat — greeting shown before the first message
pub async fn greeting() -> Json<GreetingResponse> {
    Json(GreetingResponse { greeting: GREETING })
}

/// Close the channel and collect everything rendered during the request
fn drain(
    tx: mpsc::UnboundedSender<RenderEvent>,
    mut rx: mpsc::UnboundedReceiver<RenderEvent>,
) -> Vec<RenderPayload> {
    drop(tx);
    let mut renders = Vec::new();
    while let Ok(event) = rx.try_recv() {
        renders.push(RenderPayload::from(event));
    }
    renders
}
