use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Competitor, MatchRequest, SlotPosition};

/// A user asking for an empty slot
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitSlotRequest {
    #[schema(value_type = i16, minimum = 1, maximum = 2)]
    pub position: SlotPosition,

    #[validate(length(max = 500, message = "Message must be at most 500 characters"))]
    pub message: Option<String>,
}

/// An organizer offering a slot to a user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendInviteRequest {
    pub user_id: Uuid,

    #[schema(value_type = i16, minimum = 1, maximum = 2)]
    pub position: SlotPosition,

    #[validate(length(max = 500, message = "Message must be at most 500 characters"))]
    pub message: Option<String>,
}

/// An organizer filling a slot with someone who has no profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddManualCompetitorRequest {
    #[schema(value_type = i16, minimum = 1, maximum = 2)]
    pub position: SlotPosition,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,
}

/// Result of approving a request: the accepted record and the seat it produced
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApprovalResponse {
    pub request: MatchRequest,
    pub competitor: Competitor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_rejects_invalid_position() {
        let result = serde_json::from_str::<SubmitSlotRequest>(r#"{"position": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_long_message_fails_validation() {
        let req = SubmitSlotRequest {
            position: SlotPosition::FIRST,
            message: Some("x".repeat(501)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_manual_competitor_requires_name() {
        let req = AddManualCompetitorRequest {
            position: SlotPosition::SECOND,
            name: String::new(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
