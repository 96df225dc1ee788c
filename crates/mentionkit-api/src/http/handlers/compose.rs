//! Message composition endpoint handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use mentionkit_types::mention::ComposedMessage;

use crate::http::error::AppError;
use crate::http::extractors::user::UserId;
use crate::http::response::{ApiResponse, begin_request, elapsed_ms};
use crate::state::AppState;

/// Request body for composing (and posting) a message.
#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    pub text: String,
    #[serde(default)]
    pub attachment_ids: Vec<String>,
}

/// Composed message plus the flattened runtime payload.
#[derive(Debug, Serialize)]
pub struct ComposeResponse {
    #[serde(flatten)]
    pub composed: ComposedMessage,
    pub payload: String,
}

impl From<ComposedMessage> for ComposeResponse {
    fn from(composed: ComposedMessage) -> Self {
        let payload = composed.to_payload();
        Self { composed, payload }
    }
}

/// POST /api/v1/compose - Compose a message without persisting it.
pub async fn compose_message(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(body): Json<ComposeRequest>,
) -> Result<Json<ApiResponse<ComposeResponse>>, AppError> {
    let (request_id, start) = begin_request();

    let composed = state
        .chat_service
        .compose(&user_id, &body.text, &body.attachment_ids)
        .await;

    let resp = ApiResponse::success(ComposeResponse::from(composed), request_id, elapsed_ms(start));
    Ok(Json(resp))
}
