use sqlx::PgPool;
use storage::{
    dto::profile::UpsertProfileRequest, error::Result, models::Profile,
    repository::profile::ProfileRepository,
};
use uuid::Uuid;

/// Get a profile by id
pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Profile> {
    let repo = ProfileRepository::new(pool);
    repo.find_by_id(id).await
}

/// Create or update the caller's profile
pub async fn upsert_profile(
    pool: &PgPool,
    id: Uuid,
    request: &UpsertProfileRequest,
) -> Result<Profile> {
    let repo = ProfileRepository::new(pool);
    let profile = repo.upsert(id, request).await?;
    tracing::info!(profile_id = %id, username = %profile.username, "Profile saved");
    Ok(profile)
}
