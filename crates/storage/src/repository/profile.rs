use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::profile::UpsertProfileRequest;
use crate::error::{Result, StorageError, map_write_error};
use crate::models::Profile;

pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, username, full_name, belt, avatar_url, created_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(profile)
    }

    /// Create the profile for an authenticated user, or update it if it exists
    pub async fn upsert(&self, id: Uuid, req: &UpsertProfileRequest) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, username, full_name, belt, avatar_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id)
            DO UPDATE SET
                username = EXCLUDED.username,
                full_name = EXCLUDED.full_name,
                belt = EXCLUDED.belt,
                avatar_url = EXCLUDED.avatar_url
            RETURNING id, username, full_name, belt, avatar_url, created_at
            "#,
        )
        .bind(id)
        .bind(&req.username)
        .bind(&req.full_name)
        .bind(&req.belt)
        .bind(&req.avatar_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "Username already taken", "Unknown profile"))?;

        Ok(profile)
    }
}
