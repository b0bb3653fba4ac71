use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use storage::Database;

use super::handlers::{
    add_manual_competitor, confirm_match, delete_match, get_match, list_requests,
    remove_competitor, send_invite, submit_request, update_match,
};
use crate::middleware::auth::{AuthKeys, require_auth};

pub fn routes(auth_keys: AuthKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/:id", put(update_match).delete(delete_match))
        .route("/:id/requests", get(list_requests).post(submit_request))
        .route("/:id/invites", post(send_invite))
        .route("/:id/confirm", post(confirm_match))
        .route("/:id/competitors", post(add_manual_competitor))
        .route("/:id/competitors/:competitor_id", delete(remove_competitor))
        .route_layer(middleware::from_fn_with_state(auth_keys, require_auth));

    Router::new()
        .route("/:id", get(get_match))
        .merge(protected)
}
