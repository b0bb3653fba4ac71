use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{approve_request, delete_request, list_my_requests, reject_request};
use crate::middleware::auth::{AuthKeys, require_auth};

/// Every request endpoint acts on behalf of the caller
pub fn routes(auth_keys: AuthKeys) -> Router<Database> {
    Router::new()
        .route("/me", get(list_my_requests))
        .route("/:id", delete(delete_request))
        .route("/:id/approve", post(approve_request))
        .route("/:id/reject", post(reject_request))
        .route_layer(middleware::from_fn_with_state(auth_keys, require_auth))
}
