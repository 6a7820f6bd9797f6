use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    count_event_registrations, create_registration, get_registration, list_my_registrations,
    update_registration_status,
};
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    let gateway = Router::new()
        .route(
            "/events/:event_id/registrations/count",
            get(count_event_registrations),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/events/:event_id/registrations", post(create_registration))
        .route("/registrations", get(list_my_registrations))
        .route("/registrations/:id", get(get_registration))
        .route("/registrations/:id/status", put(update_registration_status))
        .merge(gateway)
}
