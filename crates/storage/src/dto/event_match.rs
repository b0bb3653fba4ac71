use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Competitor, EventMatch, MatchFormat, MatchStatus};

pub(crate) const BELT_LEVELS: &[&str] = &["white", "blue", "purple", "brown", "black"];

/// Request payload for adding a match to an event
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEventMatchRequest {
    #[validate(custom(function = "validate_belt_level"))]
    pub belt_level: String,

    #[validate(custom(function = "validate_gender"))]
    pub gender: String,

    /// Weight limit in kilograms, absent for open weight
    #[validate(custom(function = "validate_weight_limit"))]
    pub weight_limit: Option<Decimal>,

    #[serde(default = "default_format")]
    pub format: MatchFormat,

    /// Time limit in minutes
    #[validate(range(min = 1, max = 60, message = "Time limit must be between 1 and 60 minutes"))]
    #[serde(default = "default_time_limit")]
    pub time_limit: i16,

    #[serde(default)]
    pub match_order: i32,
}

/// Request payload for updating a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEventMatchRequest {
    #[validate(custom(function = "validate_belt_level"))]
    pub belt_level: Option<String>,

    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,

    #[validate(custom(function = "validate_weight_limit"))]
    pub weight_limit: Option<Decimal>,

    /// Clears the weight limit, making the match open weight
    #[serde(default)]
    pub open_weight: bool,

    pub format: Option<MatchFormat>,

    #[validate(range(min = 1, max = 60, message = "Time limit must be between 1 and 60 minutes"))]
    pub time_limit: Option<i16>,

    /// Only `completed` or `cancelled`; confirmation has its own endpoint
    pub status: Option<MatchStatus>,

    pub match_order: Option<i32>,
}

impl UpdateEventMatchRequest {
    pub fn validate_status_change(&self) -> Result<(), &'static str> {
        match self.status {
            None | Some(MatchStatus::Completed) | Some(MatchStatus::Cancelled) => Ok(()),
            Some(MatchStatus::Confirmed) => Err("Use the confirm endpoint to confirm a match"),
            Some(MatchStatus::Pending) => Err("A match cannot be moved back to pending"),
        }
    }

    pub fn validate_weight_change(&self) -> Result<(), &'static str> {
        if self.open_weight && self.weight_limit.is_some() {
            Err("Set either weight_limit or open_weight, not both")
        } else {
            Ok(())
        }
    }

    /// The weight limit after applying this update on top of `current`
    pub fn resolve_weight_limit(&self, current: Option<Decimal>) -> Option<Decimal> {
        if self.open_weight {
            None
        } else {
            self.weight_limit.or(current)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventMatchResponse {
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

/// A match with whoever currently holds its slots
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub event_match: EventMatchResponse,
    pub competitors: Vec<Competitor>,
}

impl MatchDetail {
    pub fn new(event_match: EventMatch, competitors: Vec<Competitor>) -> Self {
        Self {
            event_match: EventMatchResponse::from(event_match),
            competitors,
        }
    }
}

fn default_format() -> MatchFormat {
    MatchFormat::Gi
}

fn default_time_limit() -> i16 {
    10
}

pub(crate) fn validate_belt_level(belt: &str) -> Result<(), validator::ValidationError> {
    if BELT_LEVELS.contains(&belt) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_belt_level"))
    }
}

fn validate_gender(gender: &str) -> Result<(), validator::ValidationError> {
    const VALID_GENDERS: &[&str] = &["male", "female"];

    if VALID_GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_gender"))
    }
}

fn validate_weight_limit(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if *weight > Decimal::ZERO && *weight < Decimal::from(500) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_weight_limit"))
    }
}

impl From<EventMatch> for EventMatchResponse {
    fn from(m: EventMatch) -> Self {
        Self {
            match_id: m.match_id,
            event_id: m.event_id,
            belt_level: m.belt_level,
            gender: m.gender,
            weight_limit: m.weight_limit,
            format: m.format,
            time_limit: m.time_limit,
            status: m.status,
            match_order: m.match_order,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_match_defaults() {
        let req: CreateEventMatchRequest =
            serde_json::from_str(r#"{"belt_level": "purple", "gender": "male"}"#).unwrap();
        assert_eq!(req.format, MatchFormat::Gi);
        assert_eq!(req.time_limit, 10);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_unknown_belt_is_rejected() {
        let req: CreateEventMatchRequest =
            serde_json::from_str(r#"{"belt_level": "green", "gender": "male"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("belt_level"));
    }

    #[test]
    fn test_non_positive_weight_limit_is_rejected() {
        let req: CreateEventMatchRequest = serde_json::from_str(
            r#"{"belt_level": "black", "gender": "female", "weight_limit": "0"}"#,
        )
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("weight_limit"));
    }

    #[test]
    fn test_status_change_rules() {
        let mut req: UpdateEventMatchRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate_status_change().is_ok());

        req.status = Some(MatchStatus::Cancelled);
        assert!(req.validate_status_change().is_ok());

        req.status = Some(MatchStatus::Confirmed);
        assert!(req.validate_status_change().is_err());

        req.status = Some(MatchStatus::Pending);
        assert!(req.validate_status_change().is_err());
    }

    #[test]
    fn test_open_weight_clears_existing_limit() {
        let current = Some(Decimal::new(7640, 2));

        let keep: UpdateEventMatchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(keep.resolve_weight_limit(current), current);

        let change: UpdateEventMatchRequest =
            serde_json::from_str(r#"{"weight_limit": "88.3"}"#).unwrap();
        assert_eq!(change.resolve_weight_limit(current), Some(Decimal::new(883, 1)));

        let clear: UpdateEventMatchRequest =
            serde_json::from_str(r#"{"open_weight": true}"#).unwrap();
        assert!(clear.validate_weight_change().is_ok());
        assert_eq!(clear.resolve_weight_limit(current), None);
    }

    #[test]
    fn test_open_weight_with_limit_is_contradictory() {
        let req: UpdateEventMatchRequest =
            serde_json::from_str(r#"{"weight_limit": "70", "open_weight": true}"#).unwrap();
        assert!(req.validate_weight_change().is_err());
    }
}
