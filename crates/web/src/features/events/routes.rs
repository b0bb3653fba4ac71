use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{
    create_event, create_match, delete_event, get_event, list_events, update_event,
};
use crate::middleware::auth::{AuthKeys, require_auth};

pub fn routes(auth_keys: AuthKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/", post(create_event))
        .route("/:slug", put(update_event).delete(delete_event))
        .route("/:slug/matches", post(create_match))
        .route_layer(middleware::from_fn_with_state(auth_keys, require_auth));

    Router::new()
        .route("/", get(list_events))
        .route("/:slug", get(get_event))
        .merge(protected)
}
