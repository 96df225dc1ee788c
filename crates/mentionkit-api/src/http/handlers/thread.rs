//! Thread endpoint handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;

use mentionkit_core::chat::service::PostedMessage;
use mentionkit_types::action::{ActionRequest, ActionResult};
use mentionkit_types::thread::{ThreadItem, ThreadMetadata};

use crate::http::error::AppError;
use crate::http::extractors::query::{ItemListQuery, ThreadListQuery};
use crate::http::extractors::user::UserId;
use crate::http::handlers::compose::{ComposeRequest, ComposeResponse};
use crate::http::response::{ApiResponse, begin_request, elapsed_ms};
use crate::state::AppState;

/// Posted user item plus its composition.
#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub item: ThreadItem,
    pub composed: ComposeResponse,
}

impl From<PostedMessage> for PostMessageResponse {
    fn from(posted: PostedMessage) -> Self {
        Self {
            item: posted.item,
            composed: ComposeResponse::from(posted.composed),
        }
    }
}

/// GET /api/v1/threads - List the caller's threads, newest first.
pub async fn list_threads(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<ThreadListQuery>,
) -> Result<Json<ApiResponse<Vec<ThreadMetadata>>>, AppError> {
    let (request_id, start) = begin_request();
    let limit = query.limit.unwrap_or(state.config.history_limit);

    let threads = state.chat_service.list_threads(&user_id, limit).await?;

    let resp = ApiResponse::success(threads, request_id, elapsed_ms(start))
        .with_link("self", "/api/v1/threads");
    Ok(Json(resp))
}

/// DELETE /api/v1/threads/{id} - Delete a thread and its items.
pub async fn delete_thread(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(thread_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let (request_id, start) = begin_request();

    state.chat_service.delete_thread(&user_id, &thread_id).await?;

    let resp = ApiResponse::success(
        serde_json::json!({ "deleted": thread_id }),
        request_id,
        elapsed_ms(start),
    );
    Ok(Json(resp))
}

/// POST /api/v1/threads/{id}/messages - Compose a message and append it.
///
/// Creates the thread on first use.
pub async fn post_message(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(thread_id): Path<String>,
    Json(body): Json<ComposeRequest>,
) -> Result<Json<ApiResponse<PostMessageResponse>>, AppError> {
    let (request_id, start) = begin_request();

    let posted = state
        .chat_service
        .post_message(&user_id, &thread_id, &body.text, &body.attachment_ids)
        .await?;

    let resp = ApiResponse::success(
        PostMessageResponse::from(posted),
        request_id,
        elapsed_ms(start),
    )
    .with_link("items", &format!("/api/v1/threads/{thread_id}/items"));
    Ok(Json(resp))
}

/// POST /api/v1/threads/{id}/actions - Dispatch an action within a thread.
pub async fn dispatch_thread_action(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(thread_id): Path<String>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ApiResponse<ActionResult>>, AppError> {
    let (request_id, start) = begin_request();

    let result = state
        .chat_service
        .dispatch_action(&user_id, &thread_id, &request)
        .await?;

    let resp = ApiResponse::success(result, request_id, elapsed_ms(start))
        .with_link("items", &format!("/api/v1/threads/{thread_id}/items"));
    Ok(Json(resp))
}

/// GET /api/v1/threads/{id}/items - Load thread items.
pub async fn list_items(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(thread_id): Path<String>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<ApiResponse<Vec<ThreadItem>>>, AppError> {
    let (request_id, start) = begin_request();
    let limit = query.limit.unwrap_or(state.config.history_limit);

    let items = state
        .chat_service
        .history(&user_id, &thread_id, limit, query.order)
        .await?;

    let resp = ApiResponse::success(items, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/threads/{thread_id}/items"));
    Ok(Json(resp))
}
