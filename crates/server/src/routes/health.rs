//! Health check endpoint

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use hapi_chat_core::build_url;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// GET /health - Check that the FHIR server answers its capability statement
pub async fn check(State(state): State<AppState>) -> impl IntoResponse {
    let endpoint = state.tool.endpoint().to_string();
    let url = build_url(state.tool.endpoint(), "metadata");

    let unhealthy = |reason: String| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                endpoint: endpoint.clone(),
                reason: Some(reason),
            }),
        )
    };

    match state.tool.client().probe(&url).await {
        Ok(status) if status.is_success() => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                endpoint: endpoint.clone(),
                reason: None,
            }),
        ),
        Ok(status) => {
            tracing::error!(status = status.as_u16(), "Health check: FHIR server error");
            unhealthy(format!("FHIR server returned {}", status))
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check: FHIR server unreachable");
            unhealthy(format!("FHIR server unreachable: {}", e))
        }
    }
}
