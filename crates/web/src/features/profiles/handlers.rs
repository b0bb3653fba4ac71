use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::profile::{ProfileResponse, UpsertProfileRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Session;

use super::services;

#[utoipa::path(
    get,
    path = "/api/profiles/{id}",
    params(
        ("id" = Uuid, Path, description = "Profile ID")
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "Profile not found")
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let profile = services::get_profile(db.pool(), id).await?;

    Ok(Json(ProfileResponse::from(profile)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/profiles/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Profile not created yet")
    ),
    tag = "profiles"
)]
pub async fn get_my_profile(
    State(db): State<Database>,
    session: Session,
) -> Result<Response, WebError> {
    let profile = services::get_profile(db.pool(), session.user_id).await?;

    Ok(Json(ProfileResponse::from(profile)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/profiles/me",
    request_body = UpsertProfileRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile saved", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Username already taken")
    ),
    tag = "profiles"
)]
pub async fn upsert_my_profile(
    State(db): State<Database>,
    session: Session,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let profile = services::upsert_profile(db.pool(), session.user_id, &req).await?;

    Ok(Json(ProfileResponse::from(profile)).into_response())
}
