use sqlx::PgPool;
use storage::{
    models::{Competitor, MatchRequest, RequestKind},
    repository::match_request::MatchRequestRepository,
    services::match_workflow::{MatchWorkflow, MatchWorkflowStore},
};
use uuid::Uuid;

use crate::error::WebResult;

/// Requests and invites addressed to the caller
pub async fn list_my_requests(pool: &PgPool, user_id: Uuid) -> WebResult<Vec<MatchRequest>> {
    Ok(MatchRequestRepository::new(pool).list_for_user(user_id).await?)
}

pub async fn approve_request(
    pool: &PgPool,
    actor: Uuid,
    request_id: Uuid,
) -> WebResult<(MatchRequest, Competitor)> {
    let workflow = MatchWorkflow::new(MatchRequestRepository::new(pool));
    Ok(workflow.approve_request(actor, request_id).await?)
}

pub async fn reject_request(pool: &PgPool, actor: Uuid, request_id: Uuid) -> WebResult<MatchRequest> {
    let workflow = MatchWorkflow::new(MatchRequestRepository::new(pool));
    Ok(workflow.reject_request(actor, request_id).await?)
}

/// Invites are cancelled by the organizer, requests withdrawn by their sender
pub async fn delete_request(pool: &PgPool, actor: Uuid, request_id: Uuid) -> WebResult<()> {
    let workflow = MatchWorkflow::new(MatchRequestRepository::new(pool));
    let request = workflow.store().find_request(request_id).await?;

    match request.kind {
        RequestKind::Invite => workflow.cancel_invite(actor, request_id).await?,
        RequestKind::Request => workflow.withdraw_request(actor, request_id).await?,
    }

    Ok(())
}
