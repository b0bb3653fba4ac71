use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use storage::services::match_workflow::WorkflowError;
use validator::ValidationErrors;

use crate::features::videos::client::VideoError;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Workflow(WorkflowError),
    Validation(ValidationErrors),
    Video(VideoError),
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Workflow(e) => write!(f, "Workflow error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Video(e) => write!(f, "Video platform error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
        }
    }
}

fn storage_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::NotFound => StatusCode::NOT_FOUND,
        StorageError::ConstraintViolation(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn storage_body(error: &StorageError) -> serde_json::Value {
    match error {
        StorageError::NotFound => json!({ "error": "Resource not found" }),
        StorageError::ConstraintViolation(msg) => json!({ "error": msg }),
        e => {
            tracing::error!("Storage error: {:?}", e);
            json!({ "error": "An internal error occurred" })
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(e) | Self::Workflow(WorkflowError::Storage(e)) => storage_status(e),
            Self::Workflow(WorkflowError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Workflow(WorkflowError::RequestsClosed) => StatusCode::FORBIDDEN,
            Self::Workflow(WorkflowError::WrongKind { .. }) => StatusCode::BAD_REQUEST,
            Self::Workflow(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Video(VideoError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Video(VideoError::InvalidAssetId(_)) => StatusCode::BAD_REQUEST,
            Self::Video(VideoError::Platform { status, .. }) if *status == 404 => {
                StatusCode::NOT_FOUND
            }
            Self::Video(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        };

        let body = match &self {
            Self::Storage(e) | Self::Workflow(WorkflowError::Storage(e)) => storage_body(e),
            Self::Workflow(e) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::Video(VideoError::InvalidAssetId(_)) => {
                json!({
                    "error": "Invalid asset id"
                })
            }
            Self::Video(e) => {
                tracing::error!("Video platform error: {}", e);
                json!({
                    "error": "Video platform request failed"
                })
            }
            Self::BadRequest(msg) | Self::Forbidden(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<WorkflowError> for WebError {
    fn from(error: WorkflowError) -> Self {
        Self::Workflow(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<VideoError> for WebError {
    fn from(error: VideoError) -> Self {
        Self::Video(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::{RequestStatus, SlotPosition};

    fn status_of(error: WebError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_storage_errors_map_to_http() {
        assert_eq!(
            status_of(StorageError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(StorageError::ConstraintViolation("Slug already exists".into()).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_workflow_errors_map_to_http() {
        assert_eq!(
            status_of(WorkflowError::Forbidden("nope").into()),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(WorkflowError::SlotFilled(SlotPosition::FIRST).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(WorkflowError::DuplicateRequest(RequestStatus::Pending).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(WorkflowError::Storage(StorageError::NotFound).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_video_errors_map_to_http() {
        assert_eq!(
            status_of(VideoError::NotConfigured.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(
                VideoError::Platform {
                    status: 500,
                    body: String::new()
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }
}
