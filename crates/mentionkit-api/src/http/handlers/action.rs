//! Action bridge endpoint handler.
//!
//! A rejected action is a normal outcome: the response is 200 with
//! `status` set to `rejected` or `error` in the result.

use axum::Json;
use axum::extract::State;

use mentionkit_types::action::{ActionRequest, ActionResult};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, begin_request, elapsed_ms};
use crate::state::AppState;

/// POST /api/v1/actions - Dispatch a UI action outside any thread.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ApiResponse<ActionResult>>, AppError> {
    let (request_id, start) = begin_request();
    let result = state.chat_service.bridge().dispatch(&request);

    let resp = ApiResponse::success(result, request_id, elapsed_ms(start));
    Ok(Json(resp))
}
