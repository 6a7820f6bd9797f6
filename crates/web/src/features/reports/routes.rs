use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{dashboard_stats, detailed_registrations};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route(
            "/events/:event_id/registrations/detailed",
            get(detailed_registrations),
        )
        .route("/admin/stats", get(dashboard_stats))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
