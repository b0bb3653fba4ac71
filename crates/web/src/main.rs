use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use storage::Database;

mod config;
mod error;
mod features;
mod middleware;
mod routes;

use config::Config;
use features::videos::client::VideoPlatformClient;
use middleware::auth::AuthKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::events::handlers::list_events,
        features::events::handlers::get_event,
        features::events::handlers::create_event,
        features::events::handlers::update_event,
        features::events::handlers::delete_event,
        features::events::handlers::create_match,
        features::matches::handlers::get_match,
        features::matches::handlers::update_match,
        features::matches::handlers::delete_match,
        features::matches::handlers::list_requests,
        features::matches::handlers::submit_request,
        features::matches::handlers::send_invite,
        features::matches::handlers::confirm_match,
        features::matches::handlers::add_manual_competitor,
        features::matches::handlers::remove_competitor,
        features::requests::handlers::list_my_requests,
        features::requests::handlers::approve_request,
        features::requests::handlers::reject_request,
        features::requests::handlers::delete_request,
        features::profiles::handlers::get_profile,
        features::profiles::handlers::get_my_profile,
        features::profiles::handlers::upsert_my_profile,
        features::videos::handlers::delete_asset,
        features::videos::handlers::update_asset_metadata,
    ),
    components(
        schemas(
            storage::dto::event::CreateEventRequest,
            storage::dto::event::UpdateEventRequest,
            storage::dto::event::EventResponse,
            storage::dto::event::EventDetailResponse,
            storage::dto::event_match::CreateEventMatchRequest,
            storage::dto::event_match::UpdateEventMatchRequest,
            storage::dto::event_match::EventMatchResponse,
            storage::dto::event_match::MatchDetail,
            storage::dto::match_request::SubmitSlotRequest,
            storage::dto::match_request::SendInviteRequest,
            storage::dto::match_request::AddManualCompetitorRequest,
            storage::dto::match_request::ApprovalResponse,
            storage::dto::profile::UpsertProfileRequest,
            storage::dto::profile::ProfileResponse,
            storage::dto::common::PaginationMeta,
            storage::models::Competitor,
            storage::models::CompetitorType,
            storage::models::MatchFormat,
            storage::models::MatchStatus,
            storage::models::MatchRequest,
            storage::models::RequestKind,
            storage::models::RequestStatus,
            features::videos::handlers::UpdateVideoMetadataRequest,
            features::videos::handlers::VideoMetadataResponse,
            features::videos::handlers::VideoDeletedResponse,
        )
    ),
    tags(
        (name = "events", description = "Events and their match cards"),
        (name = "matches", description = "Matches, competitor slots and slot requests"),
        (name = "requests", description = "Answering, cancelling and withdrawing slot requests"),
        (name = "profiles", description = "Competitor profiles"),
        (name = "videos", description = "Video platform asset management"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting BJJ events API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let auth_keys = AuthKeys::from_secret(&config.jwt_secret);
    let video_client =
        VideoPlatformClient::new(&config.video).context("Failed to build video platform client")?;
    if !video_client.is_configured() {
        tracing::warn!("Video platform credentials missing, video endpoints will answer 503");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    let app = routes::router(db, auth_keys, video_client)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);

    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
