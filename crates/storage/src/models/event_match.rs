use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "match_format", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    Gi,
    Nogi,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "match_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Slots can only change hands while the pairing is still being arranged.
    pub fn accepts_competitors(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EventMatch {
    pub match_id: Uuid,
    pub event_id: Uuid,
    pub belt_level: String,
    pub gender: String,
    pub weight_limit: Option<Decimal>,
    pub format: MatchFormat,
    pub time_limit: i16,
    pub status: MatchStatus,
    pub match_order: i32,
    pub created_at: chrono::NaiveDateTime,
}

/// A match joined with the event-level fields the request workflow needs.
#[derive(Debug, Clone, FromRow)]
pub struct MatchContext {
    pub match_id: Uuid,
    pub event_id: Uuid,
    pub organizer_id: Uuid,
    pub open_requests: bool,
    pub status: MatchStatus,
}

impl MatchContext {
    pub fn is_organizer(&self, user_id: Uuid) -> bool {
        self.organizer_id == user_id
    }
}
