use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// One of the two seats of a match.
///
/// Stored as a `SMALLINT` and only constructible for 1 or 2, so a position
/// read from a request body or a row is always a real slot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(try_from = "i16", into = "i16")]
#[sqlx(transparent)]
pub struct SlotPosition(i16);

impl SlotPosition {
    pub const FIRST: Self = Self(1);
    pub const SECOND: Self = Self(2);

    pub fn new(value: i16) -> Option<Self> {
        match value {
            1 | 2 => Some(Self(value)),
            _ => None,
        }
    }

    pub fn get(self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for SlotPosition {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("position must be 1 or 2, got {}", value))
    }
}

impl From<SlotPosition> for i16 {
    fn from(position: SlotPosition) -> Self {
        position.0
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "competitor_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompetitorType {
    /// A registered profile
    User,
    /// A name typed in by the organizer
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competitor {
    pub competitor_id: Uuid,
    pub match_id: Uuid,
    #[schema(value_type = i16, minimum = 1, maximum = 2)]
    pub position: SlotPosition,
    pub competitor_type: CompetitorType,
    pub user_id: Option<Uuid>,
    pub manual_name: Option<String>,
    pub confirmed: bool,
    pub created_at: chrono::NaiveDateTime,
}
