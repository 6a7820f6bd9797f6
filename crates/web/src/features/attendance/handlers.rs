use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::attendance::{AttendanceListQuery, AttendanceListResponse, MarkAttendanceRequest},
    dto::common::PageInfo,
    models::Attendance,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/registrations/{registration_id}/attendance",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("registration_id" = Uuid, Path, description = "Registration id")
    ),
    request_body = MarkAttendanceRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Attendance marked (created or updated in place)", body = Attendance),
        (status = 400, description = "Invalid attendance status or notes"),
        (status = 403, description = "Actor is not an admin"),
        (status = 404, description = "Event or registration not found")
    ),
    tag = "attendance"
)]
pub async fn mark_attendance(
    State(db): State<Database>,
    Path((event_id, registration_id)): Path<(Uuid, Uuid)>,
    actor: Actor,
    Json(req): Json<MarkAttendanceRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let admin_id = actor.require_admin()?;

    let attendance =
        services::mark_attendance(db.pool(), event_id, registration_id, &req, admin_id).await?;

    // 200 whether the mark created the row or updated it: the operation is
    // an idempotent upsert
    Ok(Json(attendance).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/attendance",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        AttendanceListQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Attendance joined with participant data, plus statistics", body = AttendanceListResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Event not found")
    ),
    tag = "attendance"
)]
pub async fn list_event_attendance(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<AttendanceListQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let (items, statistics, total) =
        services::list_event_attendance(db.pool(), event_id, &query).await?;

    let response = AttendanceListResponse {
        items,
        statistics,
        pagination: PageInfo::new(query.pagination.page, query.pagination.limit, total),
    };

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/attendance/export",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "CSV export, one row per attendance record", content_type = "text/csv"),
        (status = 404, description = "Event not found")
    ),
    tag = "attendance"
)]
pub async fn export_event_attendance(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let csv = services::export_event_attendance(db.pool(), event_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"attendance-{event_id}.csv\""),
            ),
        ],
        csv,
    )
        .into_response())
}
