//! Competitor request workflow.
//!
//! Every way a match slot changes hands goes through [`MatchWorkflow`]: users
//! asking for a slot, organizers inviting someone, the answer to either, and
//! the organizer removing or confirming competitors. Authorization and status
//! checks live here; the [`MatchWorkflowStore`] implementation is responsible
//! for making each two-record write atomic.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{
    Competitor, EventMatch, MatchContext, MatchRequest, MatchStatus, NewMatchRequest, RequestKind,
    RequestStatus, RequestTransition, SlotPosition,
};

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("This event only fills slots by invitation")]
    RequestsClosed,

    #[error("Match is {0} and no longer accepts competitors")]
    MatchNotOpen(MatchStatus),

    #[error("Position {0} is already filled")]
    SlotFilled(SlotPosition),

    #[error("User already holds a slot in this match")]
    AlreadyCompeting,

    #[error("A {0} request for this slot already exists")]
    DuplicateRequest(RequestStatus),

    #[error("Cannot {action} a request that is {status}")]
    InvalidTransition {
        action: &'static str,
        status: RequestStatus,
    },

    #[error("Expected a {expected:?} but found a {actual:?}")]
    WrongKind {
        expected: RequestKind,
        actual: RequestKind,
    },
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

/// Result of atomically accepting a request and seating its user.
#[derive(Debug)]
pub enum AcceptOutcome {
    Accepted {
        request: MatchRequest,
        competitor: Competitor,
    },
    /// The request was answered by someone else first
    NotPending,
    /// Another competitor already holds the position
    SlotTaken,
    /// The user already holds the other position of the match
    UserSeated,
}

/// Persistence operations the workflow relies on.
///
/// Methods returning `Option` or an outcome enum report lost races (a
/// concurrent answer, a slot taken in the meantime) as values rather than
/// errors; `Err` is reserved for storage failures and missing rows.
#[async_trait]
pub trait MatchWorkflowStore: Send + Sync {
    /// The match plus its event's organizer and request policy
    async fn match_context(&self, match_id: Uuid) -> Result<MatchContext>;

    async fn find_request(&self, request_id: Uuid) -> Result<MatchRequest>;

    /// The request row, if any, for this user and slot
    async fn find_slot_request(
        &self,
        match_id: Uuid,
        user_id: Uuid,
        position: SlotPosition,
    ) -> Result<Option<MatchRequest>>;

    async fn competitors(&self, match_id: Uuid) -> Result<Vec<Competitor>>;

    async fn find_competitor(&self, competitor_id: Uuid) -> Result<Competitor>;

    /// Inserts a pending request; `None` if a row for the same user and slot
    /// appeared concurrently.
    async fn insert_request(&self, request: &NewMatchRequest) -> Result<Option<MatchRequest>>;

    /// Moves a rejected request back to pending with a new kind, requester and
    /// message; `None` if it is no longer rejected.
    async fn reopen_request(
        &self,
        request_id: Uuid,
        kind: RequestKind,
        requested_by: Uuid,
        message: Option<&str>,
    ) -> Result<Option<MatchRequest>>;

    /// Marks a pending request accepted and inserts its competitor row in one
    /// transaction.
    async fn accept_request(&self, request_id: Uuid, responder: Uuid) -> Result<AcceptOutcome>;

    /// Marks a pending request rejected; `None` if it is no longer pending.
    async fn reject_request(&self, request_id: Uuid, responder: Uuid)
    -> Result<Option<MatchRequest>>;

    /// Deletes a pending request; `false` if it is no longer pending.
    async fn delete_pending_request(&self, request_id: Uuid) -> Result<bool>;

    /// `None` if the position is already taken.
    async fn insert_manual_competitor(
        &self,
        match_id: Uuid,
        position: SlotPosition,
        name: &str,
    ) -> Result<Option<Competitor>>;

    /// Deletes the competitor and the request that seated it, in one transaction.
    async fn remove_competitor(&self, competitor: &Competitor) -> Result<()>;

    /// Sets the match confirmed and confirms all of its competitors, in one
    /// transaction.
    async fn confirm_match(&self, match_id: Uuid) -> Result<EventMatch>;
}

pub struct MatchWorkflow<S> {
    store: S,
}

impl<S: MatchWorkflowStore> MatchWorkflow<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A user asks for an empty slot of a match in an open-request event.
    ///
    /// A previously rejected request for the same slot is reopened instead of
    /// duplicated.
    pub async fn submit_request(
        &self,
        actor: Uuid,
        match_id: Uuid,
        position: SlotPosition,
        message: Option<String>,
    ) -> WorkflowResult<MatchRequest> {
        let context = self.store.match_context(match_id).await?;

        if !context.open_requests {
            return Err(WorkflowError::RequestsClosed);
        }

        self.ensure_slot_available(&context, actor, position)
            .await?;

        let request = self
            .open_request(
                match_id,
                actor,
                actor,
                position,
                RequestKind::Request,
                message,
            )
            .await?;

        tracing::info!(
            request_id = %request.request_id,
            match_id = %match_id,
            user_id = %actor,
            position = %position,
            "Match request submitted"
        );

        Ok(request)
    }

    /// The organizer offers a slot to a user.
    pub async fn send_invite(
        &self,
        actor: Uuid,
        match_id: Uuid,
        target_user_id: Uuid,
        position: SlotPosition,
        message: Option<String>,
    ) -> WorkflowResult<MatchRequest> {
        let context = self.store.match_context(match_id).await?;

        if !context.is_organizer(actor) {
            return Err(WorkflowError::Forbidden(
                "Only the event organizer can send invites",
            ));
        }

        self.ensure_slot_available(&context, target_user_id, position)
            .await?;

        let invite = self
            .open_request(
                match_id,
                target_user_id,
                actor,
                position,
                RequestKind::Invite,
                message,
            )
            .await?;

        tracing::info!(
            request_id = %invite.request_id,
            match_id = %match_id,
            user_id = %target_user_id,
            position = %position,
            "Match invite sent"
        );

        Ok(invite)
    }

    /// Accepts a pending request or invite and seats its user.
    ///
    /// Requests are answered by the organizer, invites by the invited user.
    pub async fn approve_request(
        &self,
        actor: Uuid,
        request_id: Uuid,
    ) -> WorkflowResult<(MatchRequest, Competitor)> {
        let request = self.store.find_request(request_id).await?;
        let context = self.store.match_context(request.match_id).await?;

        ensure_responder(&context, &request, actor)?;
        ensure_transition(&request, RequestTransition::Accept)?;

        if !context.status.accepts_competitors() {
            return Err(WorkflowError::MatchNotOpen(context.status));
        }

        match self.store.accept_request(request_id, actor).await? {
            AcceptOutcome::Accepted {
                request,
                competitor,
            } => {
                tracing::info!(
                    request_id = %request.request_id,
                    competitor_id = %competitor.competitor_id,
                    match_id = %request.match_id,
                    position = %request.position,
                    "Match request accepted"
                );
                Ok((request, competitor))
            }
            AcceptOutcome::NotPending => Err(self.lost_race(request_id, "accept").await),
            AcceptOutcome::SlotTaken => {
                tracing::warn!(
                    request_id = %request_id,
                    match_id = %request.match_id,
                    position = %request.position,
                    "Approval lost the slot to another competitor"
                );
                Err(WorkflowError::SlotFilled(request.position))
            }
            AcceptOutcome::UserSeated => Err(WorkflowError::AlreadyCompeting),
        }
    }

    /// Declines a pending request or invite. Competitor rows are untouched.
    pub async fn reject_request(&self, actor: Uuid, request_id: Uuid) -> WorkflowResult<MatchRequest> {
        let request = self.store.find_request(request_id).await?;
        let context = self.store.match_context(request.match_id).await?;

        ensure_responder(&context, &request, actor)?;
        ensure_transition(&request, RequestTransition::Reject)?;

        match self.store.reject_request(request_id, actor).await? {
            Some(rejected) => {
                tracing::info!(request_id = %request_id, "Match request rejected");
                Ok(rejected)
            }
            None => Err(self.lost_race(request_id, "reject").await),
        }
    }

    /// The organizer takes back a pending invite; the row is deleted.
    pub async fn cancel_invite(&self, actor: Uuid, request_id: Uuid) -> WorkflowResult<()> {
        let request = self.store.find_request(request_id).await?;
        ensure_kind(&request, RequestKind::Invite)?;

        let context = self.store.match_context(request.match_id).await?;
        if !context.is_organizer(actor) {
            return Err(WorkflowError::Forbidden(
                "Only the event organizer can cancel invites",
            ));
        }

        self.delete_pending(&request, "cancel").await?;
        tracing::info!(request_id = %request_id, "Match invite cancelled");

        Ok(())
    }

    /// A user takes back their own pending request; the row is deleted.
    pub async fn withdraw_request(&self, actor: Uuid, request_id: Uuid) -> WorkflowResult<()> {
        let request = self.store.find_request(request_id).await?;
        ensure_kind(&request, RequestKind::Request)?;

        if request.requested_by != actor {
            return Err(WorkflowError::Forbidden(
                "Only the requesting user can withdraw a request",
            ));
        }

        self.delete_pending(&request, "withdraw").await?;
        tracing::info!(request_id = %request_id, "Match request withdrawn");

        Ok(())
    }

    /// The organizer frees a slot, deleting the competitor together with the
    /// request that seated them.
    pub async fn remove_competitor(
        &self,
        actor: Uuid,
        match_id: Uuid,
        competitor_id: Uuid,
    ) -> WorkflowResult<()> {
        let context = self.store.match_context(match_id).await?;
        if !context.is_organizer(actor) {
            return Err(WorkflowError::Forbidden(
                "Only the event organizer can remove competitors",
            ));
        }

        let competitor = self.store.find_competitor(competitor_id).await?;
        if competitor.match_id != match_id {
            return Err(StorageError::NotFound.into());
        }

        self.store.remove_competitor(&competitor).await?;

        tracing::info!(
            competitor_id = %competitor_id,
            match_id = %match_id,
            position = %competitor.position,
            "Competitor removed"
        );

        Ok(())
    }

    /// The organizer locks in the pairing. Every existing competitor is marked
    /// confirmed whatever their number, and the current status is not checked.
    pub async fn confirm_match(&self, actor: Uuid, match_id: Uuid) -> WorkflowResult<EventMatch> {
        let context = self.store.match_context(match_id).await?;
        if !context.is_organizer(actor) {
            return Err(WorkflowError::Forbidden(
                "Only the event organizer can confirm a match",
            ));
        }

        let confirmed = self.store.confirm_match(match_id).await?;
        tracing::info!(match_id = %match_id, "Match confirmed");

        Ok(confirmed)
    }

    /// The organizer seats someone without a profile.
    pub async fn add_manual_competitor(
        &self,
        actor: Uuid,
        match_id: Uuid,
        position: SlotPosition,
        name: &str,
    ) -> WorkflowResult<Competitor> {
        let context = self.store.match_context(match_id).await?;
        if !context.is_organizer(actor) {
            return Err(WorkflowError::Forbidden(
                "Only the event organizer can add competitors",
            ));
        }

        if !context.status.accepts_competitors() {
            return Err(WorkflowError::MatchNotOpen(context.status));
        }

        self.store
            .insert_manual_competitor(match_id, position, name)
            .await?
            .ok_or(WorkflowError::SlotFilled(position))
    }

    async fn ensure_slot_available(
        &self,
        context: &MatchContext,
        user_id: Uuid,
        position: SlotPosition,
    ) -> WorkflowResult<()> {
        if !context.status.accepts_competitors() {
            return Err(WorkflowError::MatchNotOpen(context.status));
        }

        let competitors = self.store.competitors(context.match_id).await?;

        if competitors.iter().any(|c| c.position == position) {
            return Err(WorkflowError::SlotFilled(position));
        }

        if competitors.iter().any(|c| c.user_id == Some(user_id)) {
            return Err(WorkflowError::AlreadyCompeting);
        }

        Ok(())
    }

    async fn open_request(
        &self,
        match_id: Uuid,
        user_id: Uuid,
        requested_by: Uuid,
        position: SlotPosition,
        kind: RequestKind,
        message: Option<String>,
    ) -> WorkflowResult<MatchRequest> {
        let existing = self
            .store
            .find_slot_request(match_id, user_id, position)
            .await?;

        let Some(existing) = existing else {
            let new_request = NewMatchRequest {
                match_id,
                user_id,
                requested_by,
                position,
                kind,
                message,
            };

            return self
                .store
                .insert_request(&new_request)
                .await?
                .ok_or(WorkflowError::DuplicateRequest(RequestStatus::Pending));
        };

        if existing.status.apply(RequestTransition::Reopen).is_none() {
            return Err(WorkflowError::DuplicateRequest(existing.status));
        }

        tracing::debug!(request_id = %existing.request_id, "Reopening rejected request");

        self.store
            .reopen_request(existing.request_id, kind, requested_by, message.as_deref())
            .await?
            .ok_or(WorkflowError::DuplicateRequest(RequestStatus::Pending))
    }

    async fn delete_pending(&self, request: &MatchRequest, action: &'static str) -> WorkflowResult<()> {
        if !request.is_pending() {
            return Err(WorkflowError::InvalidTransition {
                action,
                status: request.status,
            });
        }

        if self.store.delete_pending_request(request.request_id).await? {
            Ok(())
        } else {
            Err(self.lost_race(request.request_id, action).await)
        }
    }

    /// Builds the error for a request answered concurrently, reporting the
    /// status it ended up in.
    async fn lost_race(&self, request_id: Uuid, action: &'static str) -> WorkflowError {
        match self.store.find_request(request_id).await {
            Ok(current) => WorkflowError::InvalidTransition {
                action,
                status: current.status,
            },
            Err(e) => e.into(),
        }
    }
}

fn ensure_responder(context: &MatchContext, request: &MatchRequest, actor: Uuid) -> WorkflowResult<()> {
    match request.kind {
        RequestKind::Request if !context.is_organizer(actor) => Err(WorkflowError::Forbidden(
            "Only the event organizer can answer match requests",
        )),
        RequestKind::Invite if request.user_id != actor => Err(WorkflowError::Forbidden(
            "Only the invited user can answer an invite",
        )),
        _ => Ok(()),
    }
}

fn ensure_transition(request: &MatchRequest, transition: RequestTransition) -> WorkflowResult<()> {
    request
        .status
        .apply(transition)
        .map(|_| ())
        .ok_or(WorkflowError::InvalidTransition {
            action: transition.verb(),
            status: request.status,
        })
}

fn ensure_kind(request: &MatchRequest, expected: RequestKind) -> WorkflowResult<()> {
    if request.kind == expected {
        Ok(())
    } else {
        Err(WorkflowError::WrongKind {
            expected,
            actual: request.kind,
        })
    }
}
