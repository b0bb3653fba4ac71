use sqlx::PgPool;
use storage::{
    dto::event_match::{MatchDetail, UpdateEventMatchRequest},
    models::{Competitor, EventMatch, MatchRequest, SlotPosition},
    repository::{event_match::MatchRepository, match_request::MatchRequestRepository},
    services::match_workflow::{MatchWorkflow, MatchWorkflowStore},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

fn workflow(pool: &PgPool) -> MatchWorkflow<MatchRequestRepository<'_>> {
    MatchWorkflow::new(MatchRequestRepository::new(pool))
}

async fn ensure_match_organizer(pool: &PgPool, actor: Uuid, match_id: Uuid) -> WebResult<()> {
    let context = MatchRequestRepository::new(pool).match_context(match_id).await?;
    if context.is_organizer(actor) {
        Ok(())
    } else {
        Err(WebError::Forbidden(
            "Only the event organizer can modify this match".to_string(),
        ))
    }
}

/// Get a match with its competitors
pub async fn get_match(pool: &PgPool, match_id: Uuid) -> WebResult<MatchDetail> {
    let repo = MatchRepository::new(pool);

    let event_match = repo.find_by_id(match_id).await?;
    let competitors = repo.list_competitors(match_id).await?;

    Ok(MatchDetail::new(event_match, competitors))
}

/// Update match details, organizer only
pub async fn update_match(
    pool: &PgPool,
    actor: Uuid,
    match_id: Uuid,
    request: &UpdateEventMatchRequest,
) -> WebResult<EventMatch> {
    ensure_match_organizer(pool, actor, match_id).await?;

    let repo = MatchRepository::new(pool);
    let existing = repo.find_by_id(match_id).await?;
    Ok(repo.update(&existing, request).await?)
}

/// Delete a match with its competitors and requests, organizer only
pub async fn delete_match(pool: &PgPool, actor: Uuid, match_id: Uuid) -> WebResult<()> {
    ensure_match_organizer(pool, actor, match_id).await?;

    MatchRepository::new(pool).delete(match_id).await?;
    tracing::info!(%match_id, "Match deleted");
    Ok(())
}

/// The organizer sees every request of the match, anyone else only the ones
/// they sent or received
pub async fn list_requests(pool: &PgPool, actor: Uuid, match_id: Uuid) -> WebResult<Vec<MatchRequest>> {
    let repo = MatchRequestRepository::new(pool);
    let context = repo.match_context(match_id).await?;

    let requests = if context.is_organizer(actor) {
        repo.list_by_match(match_id).await?
    } else {
        repo.list_by_match_for_user(match_id, actor).await?
    };

    Ok(requests)
}

pub async fn submit_request(
    pool: &PgPool,
    actor: Uuid,
    match_id: Uuid,
    position: SlotPosition,
    message: Option<String>,
) -> WebResult<MatchRequest> {
    Ok(workflow(pool)
        .submit_request(actor, match_id, position, message)
        .await?)
}

pub async fn send_invite(
    pool: &PgPool,
    actor: Uuid,
    match_id: Uuid,
    user_id: Uuid,
    position: SlotPosition,
    message: Option<String>,
) -> WebResult<MatchRequest> {
    Ok(workflow(pool)
        .send_invite(actor, match_id, user_id, position, message)
        .await?)
}

pub async fn confirm_match(pool: &PgPool, actor: Uuid, match_id: Uuid) -> WebResult<EventMatch> {
    Ok(workflow(pool).confirm_match(actor, match_id).await?)
}

pub async fn add_manual_competitor(
    pool: &PgPool,
    actor: Uuid,
    match_id: Uuid,
    position: SlotPosition,
    name: &str,
) -> WebResult<Competitor> {
    Ok(workflow(pool)
        .add_manual_competitor(actor, match_id, position, name)
        .await?)
}

pub async fn remove_competitor(
    pool: &PgPool,
    actor: Uuid,
    match_id: Uuid,
    competitor_id: Uuid,
) -> WebResult<()> {
    Ok(workflow(pool)
        .remove_competitor(actor, match_id, competitor_id)
        .await?)
}
