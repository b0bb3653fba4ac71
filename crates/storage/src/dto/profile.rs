use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::event_match::validate_belt_level;

/// Request payload for creating or updating the caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertProfileRequest {
    #[validate(length(
        min = 3,
        max = 64,
        message = "Username must be between 3 and 64 characters"
    ))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(max = 255))]
    pub full_name: Option<String>,

    #[validate(custom(function = "validate_belt_level"))]
    pub belt: Option<String>,

    #[validate(url)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub belt: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

fn validate_username(username: &str) -> Result<(), validator::ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_username"))
    }
}

impl From<crate::models::Profile> for ProfileResponse {
    fn from(profile: crate::models::Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            full_name: profile.full_name,
            belt: profile.belt,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_charset() {
        let mut req = UpsertProfileRequest {
            username: "marcelo.garcia".to_string(),
            full_name: None,
            belt: Some("black".to_string()),
            avatar_url: None,
        };
        assert!(req.validate().is_ok());

        req.username = "no spaces".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_belt_must_be_known() {
        let req = UpsertProfileRequest {
            username: "roger".to_string(),
            full_name: None,
            belt: Some("coral".to_string()),
            avatar_url: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("belt"));
    }
}
