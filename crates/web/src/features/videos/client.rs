use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::VideoConfig;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("Video platform credentials are not configured")]
    NotConfigured,

    #[error("Invalid asset id: {0:?}")]
    InvalidAssetId(String),

    #[error("Video platform request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Video platform returned {status}: {body}")]
    Platform { status: u16, body: String },
}

type Result<T> = std::result::Result<T, VideoError>;

/// Metadata the platform stores alongside an asset
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateAssetBody<'a> {
    meta: &'a AssetMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    passthrough: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    data: Asset,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub meta: AssetMeta,
}

#[derive(Clone)]
struct Credentials {
    token_id: String,
    token_secret: String,
}

/// Client for the video hosting platform's asset API
#[derive(Clone)]
pub struct VideoPlatformClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl VideoPlatformClient {
    pub fn new(config: &VideoConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let credentials = match (&config.token_id, &config.token_secret) {
            (Some(token_id), Some(token_secret)) => Some(Credentials {
                token_id: token_id.clone(),
                token_secret: token_secret.clone(),
            }),
            _ => None,
        };

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or(VideoError::NotConfigured)
    }

    /// Asset ids are opaque `[A-Za-z0-9_-]` tokens; anything else could walk
    /// out of the assets collection once joined into the URL.
    fn asset_url(&self, asset_id: &str) -> Result<String> {
        let is_valid = !asset_id.is_empty()
            && asset_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !is_valid {
            return Err(VideoError::InvalidAssetId(asset_id.to_string()));
        }

        Ok(format!("{}/video/v1/assets/{}", self.base_url, asset_id))
    }

    pub async fn delete_asset(&self, asset_id: &str) -> Result<()> {
        let url = self.asset_url(asset_id)?;
        let credentials = self.credentials()?;

        tracing::info!("Deleting video asset {}", asset_id);

        let response = self
            .client
            .delete(url)
            .basic_auth(&credentials.token_id, Some(&credentials.token_secret))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    pub async fn update_asset_metadata(
        &self,
        asset_id: &str,
        meta: &AssetMeta,
        passthrough: Option<&str>,
    ) -> Result<Asset> {
        let url = self.asset_url(asset_id)?;
        let credentials = self.credentials()?;

        tracing::info!("Updating metadata of video asset {}", asset_id);

        let response = self
            .client
            .patch(url)
            .basic_auth(&credentials.token_id, Some(&credentials.token_secret))
            .json(&UpdateAssetBody { meta, passthrough })
            .send()
            .await?;

        let envelope: AssetEnvelope = ensure_success(response).await?.json().await?;
        Ok(envelope.data)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(VideoError::Platform { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token_id: Option<&str>, token_secret: Option<&str>) -> VideoConfig {
        VideoConfig {
            api_url: "https://video.example.com/".to_string(),
            token_id: token_id.map(String::from),
            token_secret: token_secret.map(String::from),
        }
    }

    #[test]
    fn test_asset_url_ignores_trailing_slash() {
        let client = VideoPlatformClient::new(&config(None, None)).unwrap();
        assert_eq!(
            client.asset_url("abc123").unwrap(),
            "https://video.example.com/video/v1/assets/abc123"
        );
    }

    #[test]
    fn test_asset_id_cannot_leave_assets_collection() {
        let client = VideoPlatformClient::new(&config(Some("id"), Some("secret"))).unwrap();

        for asset_id in ["../../../data/v1/exports", "abc/../def", "abc?x=1", "", "a%2Fb"] {
            assert!(
                matches!(client.asset_url(asset_id), Err(VideoError::InvalidAssetId(_))),
                "{asset_id:?} accepted"
            );
        }
        assert!(client.asset_url("Xq01_yZ-9").is_ok());
    }

    #[test]
    fn test_both_tokens_are_required() {
        assert!(!VideoPlatformClient::new(&config(Some("id"), None)).unwrap().is_configured());
        assert!(VideoPlatformClient::new(&config(Some("id"), Some("secret"))).unwrap().is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_client_refuses_without_network() {
        let client = VideoPlatformClient::new(&config(None, None)).unwrap();
        let err = client.delete_asset("abc123").await.unwrap_err();
        assert!(matches!(err, VideoError::NotConfigured));
    }

    #[test]
    fn test_update_body_omits_empty_fields() {
        let meta = AssetMeta {
            title: Some("Berimbolo from De La Riva".to_string()),
            ..AssetMeta::default()
        };
        let body = serde_json::to_value(UpdateAssetBody {
            meta: &meta,
            passthrough: None,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "meta": { "title": "Berimbolo from De La Riva" } })
        );
    }
}
