use atrium_core::AppError;
use atrium_domain::AdminIdentity;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use uuid::Uuid;

use crate::dto::{
    AuditLogEntryResponse, AuditLogFilterQuery, AuditLogPageResponse, CursorPageQuery,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Query(filter): Query<AuditLogFilterQuery>,
    Query(query): Query<CursorPageQuery>,
) -> ApiResult<Json<AuditLogPageResponse>> {
    let page = state
        .audit_log_service
        .list_entries(&identity, filter.into(), query.into_request()?)
        .await?;

    Ok(Json(AuditLogPageResponse::from(page)))
}

pub async fn get_audit_log_entry_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    Path(event_id): Path<String>,
) -> ApiResult<Json<AuditLogEntryResponse>> {
    let event_id = Uuid::parse_str(event_id.trim())
        .map_err(|_| AppError::Validation(format!("invalid audit log entry id '{event_id}'")))?;
    let entry = state
        .audit_log_service
        .get_entry(&identity, event_id)
        .await?;

    Ok(Json(AuditLogEntryResponse::from(entry)))
}
