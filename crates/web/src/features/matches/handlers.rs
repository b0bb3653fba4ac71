use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        event_match::{EventMatchResponse, MatchDetail, UpdateEventMatchRequest},
        match_request::{AddManualCompetitorRequest, SendInviteRequest, SubmitSlotRequest},
    },
    models::{Competitor, MatchRequest},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Session;

use super::services;

#[utoipa::path(
    get,
    path = "/api/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    responses(
        (status = 200, description = "Match with its competitors", body = MatchDetail),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn get_match(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = services::get_match(db.pool(), id).await?;

    Ok(Json(detail).into_response())
}

#[utoipa::path(
    put,
    path = "/api/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    request_body = UpdateEventMatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Match updated successfully", body = EventMatchResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn update_match(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(update_req): Json<UpdateEventMatchRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    update_req
        .validate_status_change()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    update_req
        .validate_weight_change()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let updated = services::update_match(db.pool(), session.user_id, id, &update_req).await?;

    Ok(Json(EventMatchResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/matches/{id}",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Match deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn delete_match(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_match(db.pool(), session.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    get,
    path = "/api/matches/{id}/requests",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Requests and invites visible to the caller", body = Vec<MatchRequest>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn list_requests(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let requests = services::list_requests(db.pool(), session.user_id, id).await?;

    Ok(Json(requests).into_response())
}

#[utoipa::path(
    post,
    path = "/api/matches/{id}/requests",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    request_body = SubmitSlotRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Request submitted", body = MatchRequest),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Event only fills slots by invitation"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Slot filled, duplicate request or match not open")
    ),
    tag = "matches"
)]
pub async fn submit_request(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitSlotRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let request =
        services::submit_request(db.pool(), session.user_id, id, req.position, req.message)
            .await?;

    Ok((StatusCode::CREATED, Json(request)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/matches/{id}/invites",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    request_body = SendInviteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Invite sent", body = MatchRequest),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Slot filled, duplicate invite or match not open")
    ),
    tag = "matches"
)]
pub async fn send_invite(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<SendInviteRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let invite = services::send_invite(
        db.pool(),
        session.user_id,
        id,
        req.user_id,
        req.position,
        req.message,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(invite)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/matches/{id}/confirm",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Match and its competitors confirmed", body = EventMatchResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Match not found")
    ),
    tag = "matches"
)]
pub async fn confirm_match(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let confirmed = services::confirm_match(db.pool(), session.user_id, id).await?;

    Ok(Json(EventMatchResponse::from(confirmed)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/matches/{id}/competitors",
    params(
        ("id" = Uuid, Path, description = "Match ID")
    ),
    request_body = AddManualCompetitorRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competitor seated", body = Competitor),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Slot filled or match not open")
    ),
    tag = "matches"
)]
pub async fn add_manual_competitor(
    State(db): State<Database>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<AddManualCompetitorRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(WebError::BadRequest("Name cannot be blank".to_string()));
    }

    let competitor =
        services::add_manual_competitor(db.pool(), session.user_id, id, req.position, name)
            .await?;

    Ok((StatusCode::CREATED, Json(competitor)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/matches/{id}/competitors/{competitor_id}",
    params(
        ("id" = Uuid, Path, description = "Match ID"),
        ("competitor_id" = Uuid, Path, description = "Competitor ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Competitor removed and slot reopened"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Match or competitor not found")
    ),
    tag = "matches"
)]
pub async fn remove_competitor(
    State(db): State<Database>,
    session: Session,
    Path((id, competitor_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, WebError> {
    services::remove_competitor(db.pool(), session.user_id, id, competitor_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
