use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::Session;

use super::client::{AssetMeta, VideoPlatformClient};

/// New metadata for an uploaded technique video
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateVideoMetadataRequest {
    #[validate(length(
        min = 1,
        max = 512,
        message = "Title must be between 1 and 512 characters"
    ))]
    pub title: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[validate(length(max = 128))]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VideoMetadataResponse {
    pub asset_id: String,
    pub status: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VideoDeletedResponse {
    pub asset_id: String,
    pub deleted: bool,
}

#[utoipa::path(
    delete,
    path = "/api/videos/assets/{asset_id}",
    params(
        ("asset_id" = String, Path, description = "Asset ID on the video platform")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Asset deleted", body = VideoDeletedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found on the platform"),
        (status = 502, description = "Video platform request failed"),
        (status = 503, description = "Video platform not configured")
    ),
    tag = "videos"
)]
pub async fn delete_asset(
    State(client): State<VideoPlatformClient>,
    session: Session,
    Path(asset_id): Path<String>,
) -> Result<Response, WebError> {
    client.delete_asset(&asset_id).await?;

    tracing::info!(%asset_id, user_id = %session.user_id, "Video asset deleted");

    Ok(Json(VideoDeletedResponse {
        asset_id,
        deleted: true,
    })
    .into_response())
}

#[utoipa::path(
    put,
    path = "/api/videos/assets/{asset_id}/metadata",
    params(
        ("asset_id" = String, Path, description = "Asset ID on the video platform")
    ),
    request_body = UpdateVideoMetadataRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Metadata updated", body = VideoMetadataResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Asset not found on the platform"),
        (status = 502, description = "Video platform request failed"),
        (status = 503, description = "Video platform not configured")
    ),
    tag = "videos"
)]
pub async fn update_asset_metadata(
    State(client): State<VideoPlatformClient>,
    session: Session,
    Path(asset_id): Path<String>,
    Json(req): Json<UpdateVideoMetadataRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let meta = AssetMeta {
        title: Some(req.title),
        creator_id: Some(session.user_id.to_string()),
        external_id: req.external_id,
    };

    let asset = client
        .update_asset_metadata(&asset_id, &meta, req.description.as_deref())
        .await?;

    Ok(Json(VideoMetadataResponse {
        asset_id: asset.id,
        status: asset.status,
        title: asset.meta.title,
    })
    .into_response())
}
