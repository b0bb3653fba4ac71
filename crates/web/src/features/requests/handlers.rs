use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{Database, dto::match_request::ApprovalResponse, models::MatchRequest};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::Session;

use super::services;

#[utoipa::path(
    get,
    path = "/api/requests/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Requests and invites addressed to the caller", body = Vec<MatchRequest>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "requests"
)]
pub async fn list_my_requests(
    State(db): State<Database>,
    session: Session,
) -> Result<Response, WebError> {
    let requests = services::list_my_requests(db.pool(), session.user_id).await?;

    Ok(Json(requests).into_response())
}

#[utoipa::path(
    post,
    path = "/api/requests/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Request accepted and competitor seated", body = ApprovalResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller cannot answer this request"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not pending, slot filled or user already competing")
    ),
    tag = "requests"
)]
pub async fn approve_request(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let (request, competitor) = services::approve_request(db.pool(), session.user_id, id).await?;

    Ok(Json(ApprovalResponse {
        request,
        competitor,
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/requests/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Request rejected", body = MatchRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller cannot answer this request"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is not pending")
    ),
    tag = "requests"
)]
pub async fn reject_request(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let rejected = services::reject_request(db.pool(), session.user_id, id).await?;

    Ok(Json(rejected).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Request ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Invite cancelled or request withdrawn"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller cannot delete this request"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request is no longer pending")
    ),
    tag = "requests"
)]
pub async fn delete_request(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_request(db.pool(), session.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
