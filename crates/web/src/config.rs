use anyhow::{Context, Result};

const DEFAULT_VIDEO_API_URL: &str = "https://api.mux.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub video: VideoConfig,
}

/// Credentials for the video hosting platform. The proxy endpoints answer
/// 503 when the token pair is missing.
#[derive(Debug, Clone)]
pub struct VideoConfig {
    pub api_url: String,
    pub token_id: Option<String>,
    pub token_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            jwt_secret: std::env::var("JWT_SECRET")
                .context("Cannot load JWT_SECRET env variable")?,
            video: VideoConfig {
                api_url: std::env::var("VIDEO_API_URL")
                    .unwrap_or_else(|_| DEFAULT_VIDEO_API_URL.to_string()),
                token_id: std::env::var("VIDEO_TOKEN_ID").ok(),
                token_secret: std::env::var("VIDEO_TOKEN_SECRET").ok(),
            },
        })
    }
}
