use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::{get_my_profile, get_profile, upsert_my_profile};
use crate::middleware::auth::{AuthKeys, require_auth};

pub fn routes(auth_keys: AuthKeys) -> Router<Database> {
    let protected = Router::new()
        .route("/me", get(get_my_profile).put(upsert_my_profile))
        .route_layer(middleware::from_fn_with_state(auth_keys, require_auth));

    Router::new()
        .route("/:id", get(get_profile))
        .merge(protected)
}
