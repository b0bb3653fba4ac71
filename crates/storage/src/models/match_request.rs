use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use super::SlotPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "match_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns the status reached by applying `transition`, or `None` when the
    /// transition is not allowed from this status.
    pub fn apply(self, transition: RequestTransition) -> Option<Self> {
        match (self, transition) {
            (Self::Pending, RequestTransition::Accept) => Some(Self::Accepted),
            (Self::Pending, RequestTransition::Reject) => Some(Self::Rejected),
            (Self::Rejected, RequestTransition::Reopen) => Some(Self::Pending),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTransition {
    Accept,
    Reject,
    Reopen,
}

impl RequestTransition {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Reopen => "reopen",
        }
    }
}

/// Who started the request: the competitor asking for a slot, or the
/// organizer offering one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "match_request_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Request,
    Invite,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MatchRequest {
    pub request_id: Uuid,
    pub match_id: Uuid,
    /// The user who would fill the slot
    pub user_id: Uuid,
    pub requested_by: Uuid,
    #[schema(value_type = i16, minimum = 1, maximum = 2)]
    pub position: SlotPosition,
    pub status: RequestStatus,
    pub kind: RequestKind,
    pub message: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub responded_at: Option<chrono::NaiveDateTime>,
    pub responded_by: Option<Uuid>,
}

impl MatchRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Values for inserting a fresh request row.
#[derive(Debug, Clone)]
pub struct NewMatchRequest {
    pub match_id: Uuid,
    pub user_id: Uuid,
    pub requested_by: Uuid,
    pub position: SlotPosition,
    pub kind: RequestKind,
    pub message: Option<String>,
}
