use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{add_prize, delete_prize, list_event_prizes, update_prize};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/events/:event_id/prizes", post(add_prize))
        .route("/events/:event_id/prizes", get(list_event_prizes))
        .route("/prizes/:id", put(update_prize))
        .route("/prizes/:id", delete(delete_prize))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
