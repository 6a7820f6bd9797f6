use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::PageInfo,
    dto::prize::{AddPrizeRequest, PrizeListQuery, PrizeListResponse, UpdatePrizeRequest},
    models::Prize,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Actor;

use super::services;

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/prizes",
    params(
        ("event_id" = Uuid, Path, description = "Event id")
    ),
    request_body = AddPrizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Prize recorded", body = Prize),
        (status = 400, description = "Winner fields do not match the winner type"),
        (status = 403, description = "Actor is not an admin"),
        (status = 404, description = "Event or winning registration not found")
    ),
    tag = "prizes"
)]
pub async fn add_prize(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    actor: Actor,
    Json(req): Json<AddPrizeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    let admin_id = actor.require_admin()?;

    let prize = services::add_prize(db.pool(), event_id, &req, admin_id).await?;

    Ok((StatusCode::CREATED, Json(prize)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/prizes",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        PrizeListQuery
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Prizes with per-position aggregates", body = PrizeListResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 404, description = "Event not found")
    ),
    tag = "prizes"
)]
pub async fn list_event_prizes(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<PrizeListQuery>,
) -> Result<Response, WebError> {
    query.validate().map_err(WebError::BadRequest)?;

    let (items, statistics, total) =
        services::list_event_prizes(db.pool(), event_id, &query).await?;

    let response = PrizeListResponse {
        items,
        statistics,
        pagination: PageInfo::new(query.pagination.page, query.pagination.limit, total),
    };

    Ok(Json(response).into_response())
}

#[utoipa::path(
    put,
    path = "/api/prizes/{id}",
    params(
        ("id" = Uuid, Path, description = "Prize id")
    ),
    request_body = UpdatePrizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Prize updated", body = Prize),
        (status = 403, description = "Actor is not an admin"),
        (status = 404, description = "Prize not found")
    ),
    tag = "prizes"
)]
pub async fn update_prize(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Json(req): Json<UpdatePrizeRequest>,
) -> Result<Response, WebError> {
    req.validate()?;
    actor.require_admin()?;

    let prize = services::update_prize(db.pool(), id, &req).await?;

    Ok(Json(prize).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/prizes/{id}",
    params(
        ("id" = Uuid, Path, description = "Prize id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Prize deleted"),
        (status = 403, description = "Actor is not an admin"),
        (status = 404, description = "Prize not found")
    ),
    tag = "prizes"
)]
pub async fn delete_prize(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    actor: Actor,
) -> Result<Response, WebError> {
    actor.require_admin()?;

    services::delete_prize(db.pool(), id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
