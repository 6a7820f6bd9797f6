use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::PageInfo,
    dto::registration::RegistrationListQuery,
    dto::report::{DashboardStats, DetailedRegistrationsResponse},
};
use uuid::Uuid;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/registrations/detailed",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        RegistrationListQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Joined registration view with statistics", body = DetailedRegistrationsResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Event not found")
    ),
    tag = "reports"
)]
pub async fn detailed_registrations(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<RegistrationListQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let (items, statistics, total) =
        services::detailed_registrations(db.pool(), event_id, &query).await?;

    let response = DetailedRegistrationsResponse {
        items,
        statistics,
        pagination: PageInfo::new(query.pagination.page, query.pagination.limit, total),
    };

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Global dashboard counters", body = DashboardStats)
    ),
    tag = "reports"
)]
pub async fn dashboard_stats(State(db): State<Database>) -> Result<Response, WebError> {
    let stats = services::dashboard_stats(db.pool()).await?;

    Ok(Json(stats).into_response())
}
