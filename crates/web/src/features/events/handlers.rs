use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        event::{CreateEventRequest, EventDetailResponse, EventResponse, UpdateEventRequest},
        event_match::{CreateEventMatchRequest, EventMatchResponse},
    },
};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Session;

use super::services;

#[utoipa::path(
    get,
    path = "/api/events",
    params(PaginationParams),
    responses(
        (status = 200, description = "List events successfully", body = PaginatedResponse<EventResponse>),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(db): State<Database>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Response, WebError> {
    pagination.validate().map_err(WebError::BadRequest)?;

    let (events, total_items) = services::list_events(db.pool(), &pagination).await?;

    let data: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();

    Ok(Json(PaginatedResponse::new(data, &pagination, total_items)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/events/{slug}",
    params(
        ("slug" = String, Path, description = "Event slug")
    ),
    responses(
        (status = 200, description = "Event with its matches and competitors", body = EventDetailResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    let (event, matches) = services::get_event_detailed(db.pool(), &slug).await?;

    Ok(Json(EventDetailResponse {
        event: EventResponse::from(event),
        matches,
    })
    .into_response())
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Event created successfully", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(db): State<Database>,
    session: Session,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event = services::create_event(db.pool(), session.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(event))).into_response())
}

#[utoipa::path(
    put,
    path = "/api/events/{slug}",
    params(
        ("slug" = String, Path, description = "Event slug")
    ),
    request_body = UpdateEventRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Event updated successfully", body = EventResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(db): State<Database>,
    session: Session,
    Path(slug): Path<String>,
    Json(update_req): Json<UpdateEventRequest>,
) -> Result<Response, WebError> {
    update_req.validate()?;

    let updated = services::update_event(db.pool(), session.user_id, &slug, &update_req).await?;

    Ok(Json(EventResponse::from(updated)).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/events/{slug}",
    params(
        ("slug" = String, Path, description = "Event slug")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Event deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(db): State<Database>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<Response, WebError> {
    services::delete_event(db.pool(), session.user_id, &slug).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/events/{slug}/matches",
    params(
        ("slug" = String, Path, description = "Event slug")
    ),
    request_body = CreateEventMatchRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Match added to the event", body = EventMatchResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the organizer"),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn create_match(
    State(db): State<Database>,
    session: Session,
    Path(slug): Path<String>,
    Json(req): Json<CreateEventMatchRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let event_match = services::create_match(db.pool(), session.user_id, &slug, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventMatchResponse::from(event_match)),
    )
        .into_response())
}
