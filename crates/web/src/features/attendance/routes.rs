use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{export_event_attendance, list_event_attendance, mark_attendance};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route(
            "/events/:event_id/registrations/:registration_id/attendance",
            post(mark_attendance),
        )
        .route("/events/:event_id/attendance", get(list_event_attendance))
        .route(
            "/events/:event_id/attendance/export",
            get(export_event_attendance),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
