//! Entity registry endpoint handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};

use mentionkit_types::entity::EntityRecord;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, begin_request, elapsed_ms};
use crate::state::AppState;

/// GET /api/v1/entities - List registered entities, sorted by id.
pub async fn list_entities(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Arc<EntityRecord>>>>, AppError> {
    let (request_id, start) = begin_request();
    let records = state.registry().records();

    let resp = ApiResponse::success(records, request_id, elapsed_ms(start))
        .with_link("self", "/api/v1/entities");
    Ok(Json(resp))
}

/// GET /api/v1/entities/{id} - Fetch a single entity.
pub async fn get_entity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Arc<EntityRecord>>>, AppError> {
    let (request_id, start) = begin_request();
    let record = state
        .registry()
        .get(&id)
        .ok_or_else(|| AppError::EntityNotFound(id.clone()))?;

    let resp = ApiResponse::success(record, request_id, elapsed_ms(start))
        .with_link("self", &format!("/api/v1/entities/{id}"));
    Ok(Json(resp))
}
