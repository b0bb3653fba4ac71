use axum::{
    Router, middleware,
    routing::{delete, put},
};
use storage::Database;

use super::client::VideoPlatformClient;
use super::handlers::{delete_asset, update_asset_metadata};
use crate::middleware::auth::{AuthKeys, require_auth};

pub fn routes(auth_keys: AuthKeys, client: VideoPlatformClient) -> Router<Database> {
    Router::new()
        .route("/assets/:asset_id", delete(delete_asset))
        .route("/assets/:asset_id/metadata", put(update_asset_metadata))
        .route_layer(middleware::from_fn_with_state(auth_keys, require_auth))
        .with_state(client)
}
