use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::PageInfo,
    dto::registration::{
        CreateRegistrationRequest, RegistrationCountResponse, RegistrationListQuery,
        RegistrationListResponse, UpdateRegistrationStatusRequest,
    },
    models::Registration,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/registrations",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created", body = Registration),
        (status = 400, description = "Validation failure (missing payment screenshot, bad team shape)"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Already registered, deadline passed or event full")
    ),
    tag = "registrations"
)]
pub async fn create_registration(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    actor: Actor,
    Json(req): Json<CreateRegistrationRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let registration = services::create_registration(db.pool(), event_id, actor, &req).await?;

    Ok((StatusCode::CREATED, Json(registration)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    params(RegistrationListQuery),
    responses(
        (status = 200, description = "The caller's own registrations", body = RegistrationListResponse),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "registrations"
)]
pub async fn list_my_registrations(
    State(db): State<Database>,
    actor: Actor,
    Query(query): Query<RegistrationListQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let (items, total) = services::list_my_registrations(db.pool(), actor, &query).await?;

    let response = RegistrationListResponse {
        items,
        pagination: PageInfo::new(query.pagination.page, query.pagination.limit, total),
    };

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    responses(
        (status = 200, description = "Registration found", body = Registration),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Registration not found")
    ),
    tag = "registrations"
)]
pub async fn get_registration(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    actor: Actor,
) -> Result<Response, WebError> {
    let registration = services::get_registration(db.pool(), id, actor).await?;

    Ok(Json(registration).into_response())
}

#[utoipa::path(
    put,
    path = "/api/registrations/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Registration id")
    ),
    request_body = UpdateRegistrationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Registration),
        (status = 403, description = "Actor lacks the required role"),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Invalid status transition")
    ),
    tag = "registrations"
)]
pub async fn update_registration_status(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Json(req): Json<UpdateRegistrationStatusRequest>,
) -> Result<Response, WebError> {
    let registration = services::update_status(db.pool(), id, req.status, actor).await?;

    Ok(Json(registration).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/registrations/count",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Registration count for the event", body = RegistrationCountResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "registrations"
)]
pub async fn count_event_registrations(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let count = services::count_by_event(db.pool(), event_id).await?;

    Ok(Json(RegistrationCountResponse { count }).into_response())
}
