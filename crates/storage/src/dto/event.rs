use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::event_match::MatchDetail;

/// Request payload for creating a new event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Slug must be between 1 and 255 characters"
    ))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub location: Option<String>,

    pub event_date: Option<NaiveDate>,

    /// Whether any user may ask for an empty slot, or only invites are allowed
    #[serde(default)]
    pub open_requests: bool,
}

/// Request payload for updating an existing event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 255))]
    pub location: Option<String>,

    pub event_date: Option<NaiveDate>,

    pub open_requests: Option<bool>,
}

/// Response containing event details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub event_id: Uuid,
    pub organizer_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub open_requests: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// Event with its card of matches
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub matches: Vec<MatchDetail>,
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    let is_valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if is_valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_slug"))
    }
}

impl From<crate::models::Event> for EventResponse {
    fn from(event: crate::models::Event) -> Self {
        Self {
            event_id: event.event_id,
            organizer_id: event.organizer_id,
            name: event.name,
            slug: event.slug,
            description: event.description,
            location: event.location,
            event_date: event.event_date,
            open_requests: event.open_requests,
            created_at: event.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(slug: &str) -> CreateEventRequest {
        CreateEventRequest {
            name: "Sao Paulo Superfights".to_string(),
            slug: slug.to_string(),
            description: None,
            location: Some("Sao Paulo".to_string()),
            event_date: None,
            open_requests: true,
        }
    }

    #[test]
    fn test_valid_slug_passes() {
        assert!(create_request("sp-superfights-2025").validate().is_ok());
    }

    #[test]
    fn test_invalid_slugs_fail() {
        for slug in ["Upper", "-leading", "trailing-", "double--dash", "spa ce"] {
            let errors = create_request(slug).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("slug"), "slug {slug} passed");
        }
    }

    #[test]
    fn test_open_requests_defaults_to_invite_only() {
        let req: CreateEventRequest =
            serde_json::from_str(r#"{"name": "Open Mat", "slug": "open-mat"}"#).unwrap();
        assert!(!req.open_requests);
    }
}
