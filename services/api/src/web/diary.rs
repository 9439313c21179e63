//! services/api/src/web/diary.rs
//!
//! Diary endpoints: fetch, whole-collection replace, single-record append,
//! and edit-in-place. All of them sit behind the access-token middleware.
//!
//! Writes are whole-document and last-write-wins: two concurrent writers for
//! the same user race, and the stored document ends up equal to exactly one
//! of the submitted payloads.

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use diary_core::domain::{DiaryDocument, DiaryRecord, TagAggregates};

use crate::web::auth::MessageResponse;
use crate::web::error::WebError;
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct DiarySendRequest {
    /// The full replacement record collection.
    #[schema(value_type = Option<Vec<Object>>)]
    pub records: Option<Vec<DiaryRecord>>,
}

#[derive(Deserialize, ToSchema)]
pub struct DiaryAppendRequest {
    #[schema(value_type = Option<Object>)]
    pub record: Option<DiaryRecord>,
}

#[derive(Deserialize, ToSchema)]
pub struct DiaryEditRequest {
    #[schema(value_type = Option<Object>)]
    pub record: Option<DiaryRecord>,
}

/// The read shape expected by legacy clients.
#[derive(Serialize, ToSchema)]
pub struct DiaryResponse {
    #[serde(rename = "diaryRecords")]
    #[schema(value_type = Vec<Object>)]
    pub diary_records: Vec<DiaryRecord>,
    #[serde(rename = "diaryAllTags")]
    #[schema(value_type = Object)]
    pub diary_all_tags: TagAggregates,
}

/// The write shape: the stored document after the operation.
#[derive(Serialize, ToSchema)]
pub struct DiaryEnvelope {
    #[schema(value_type = Object)]
    pub diary: DiaryDocument,
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Resolves the authenticated email back to a user id. 404 when the user
/// was deleted out of band.
async fn resolve_user_id(state: &AppState, email: &str) -> Result<Uuid, WebError> {
    state
        .store
        .find_user_by_email(email)
        .await?
        .map(|user| user.id)
        .ok_or_else(|| WebError::NotFound("User not found".to_string()))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/diary - Fetch the user's diary, creating it lazily with empty
/// defaults on first access.
#[utoipa::path(
    post,
    path = "/api/diary",
    responses(
        (status = 200, description = "The diary records and tag aggregates", body = DiaryResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "The user no longer exists")
    )
)]
pub async fn diary_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DiaryResponse>, WebError> {
    let user_id = resolve_user_id(&state, &current.email).await?;
    let diary = state.store.get_or_create_diary(user_id).await?;

    Ok(Json(DiaryResponse {
        diary_records: diary.records,
        diary_all_tags: diary.aggregates,
    }))
}

/// POST /api/diary-send - Replace the whole record collection.
#[utoipa::path(
    post,
    path = "/api/diary-send",
    request_body = DiarySendRequest,
    responses(
        (status = 200, description = "The stored document after the replace", body = DiaryEnvelope),
        (status = 400, description = "Missing records payload"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
pub async fn diary_send_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<DiarySendRequest>,
) -> Result<Json<DiaryEnvelope>, WebError> {
    let records = req
        .records
        .ok_or_else(|| WebError::Validation("Records are required".to_string()))?;

    let user_id = resolve_user_id(&state, &current.email).await?;
    let diary = state.store.save_diary(user_id, records).await?;

    Ok(Json(DiaryEnvelope { diary }))
}

/// POST /api/diary-append - Append one record to the collection.
#[utoipa::path(
    post,
    path = "/api/diary-append",
    request_body = DiaryAppendRequest,
    responses(
        (status = 200, description = "The stored document after the append", body = DiaryEnvelope),
        (status = 400, description = "Missing record payload"),
        (status = 401, description = "Missing or invalid access token")
    )
)]
pub async fn diary_append_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<DiaryAppendRequest>,
) -> Result<Json<DiaryEnvelope>, WebError> {
    let record = req
        .record
        .ok_or_else(|| WebError::Validation("Record is required".to_string()))?;

    let user_id = resolve_user_id(&state, &current.email).await?;
    let mut records = state.store.get_or_create_diary(user_id).await?.records;
    records.push(record);
    let diary = state.store.save_diary(user_id, records).await?;

    Ok(Json(DiaryEnvelope { diary }))
}

/// POST /api/diary-edit - Replace the record whose `id` matches the payload.
#[utoipa::path(
    post,
    path = "/api/diary-edit",
    request_body = DiaryEditRequest,
    responses(
        (status = 200, description = "Record replaced in place", body = MessageResponse),
        (status = 400, description = "Missing record payload or no diary to edit into"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "No record carries the given id; collection unchanged")
    )
)]
pub async fn diary_edit_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<DiaryEditRequest>,
) -> Result<Json<MessageResponse>, WebError> {
    let record = req
        .record
        .ok_or_else(|| WebError::Validation("Record is required".to_string()))?;
    if record.id.is_empty() {
        return Err(WebError::Validation("Record id is required".to_string()));
    }

    let user_id = resolve_user_id(&state, &current.email).await?;
    let mut records = state
        .store
        .fetch_diary(user_id)
        .await?
        .ok_or_else(|| WebError::Validation("No diary to edit".to_string()))?
        .records;

    // Linear scan by id; an unknown id fails and leaves the stored
    // collection untouched.
    let slot = records
        .iter_mut()
        .find(|r| r.id == record.id)
        .ok_or_else(|| {
            WebError::NotFound(format!("Record with id {} not found", record.id))
        })?;
    *slot = record;

    state.store.save_diary(user_id, records).await?;

    Ok(Json(MessageResponse::new("Record updated")))
}
