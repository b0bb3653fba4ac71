use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Event {
    pub event_id: Uuid,
    pub organizer_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<chrono::NaiveDate>,
    pub open_requests: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl Event {
    pub fn is_organizer(&self, user_id: Uuid) -> bool {
        self.organizer_id == user_id
    }
}
