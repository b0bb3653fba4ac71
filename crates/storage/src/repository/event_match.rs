use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::event_match::{CreateEventMatchRequest, UpdateEventMatchRequest};
use crate::error::{Result, StorageError};
use crate::models::{Competitor, EventMatch};

/// Repository for matches and the competitors seated in them
pub struct MatchRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MatchRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<EventMatch>> {
        let matches = sqlx::query_as::<_, EventMatch>(
            r#"
            SELECT match_id, event_id, belt_level, gender, weight_limit, format,
                   time_limit, status, match_order, created_at
            FROM event_matches
            WHERE event_id = $1
            ORDER BY match_order, created_at
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(matches)
    }

    pub async fn find_by_id(&self, match_id: Uuid) -> Result<EventMatch> {
        let event_match = sqlx::query_as::<_, EventMatch>(
            r#"
            SELECT match_id, event_id, belt_level, gender, weight_limit, format,
                   time_limit, status, match_order, created_at
            FROM event_matches
            WHERE match_id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event_match)
    }

    pub async fn create(&self, event_id: Uuid, req: &CreateEventMatchRequest) -> Result<EventMatch> {
        let event_match = sqlx::query_as::<_, EventMatch>(
            r#"
            INSERT INTO event_matches (
                event_id, belt_level, gender, weight_limit, format, time_limit, match_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING match_id, event_id, belt_level, gender, weight_limit, format,
                      time_limit, status, match_order, created_at
            "#,
        )
        .bind(event_id)
        .bind(&req.belt_level)
        .bind(&req.gender)
        .bind(req.weight_limit)
        .bind(req.format)
        .bind(req.time_limit)
        .bind(req.match_order)
        .fetch_one(self.pool)
        .await?;

        Ok(event_match)
    }

    /// Apply the fields present in `req` on top of `existing`
    pub async fn update(
        &self,
        existing: &EventMatch,
        req: &UpdateEventMatchRequest,
    ) -> Result<EventMatch> {
        let event_match = sqlx::query_as::<_, EventMatch>(
            r#"
            UPDATE event_matches
            SET
                belt_level = $2,
                gender = $3,
                weight_limit = $4,
                format = $5,
                time_limit = $6,
                status = $7,
                match_order = $8
            WHERE match_id = $1
            RETURNING match_id, event_id, belt_level, gender, weight_limit, format,
                      time_limit, status, match_order, created_at
            "#,
        )
        .bind(existing.match_id)
        .bind(req.belt_level.as_ref().unwrap_or(&existing.belt_level))
        .bind(req.gender.as_ref().unwrap_or(&existing.gender))
        .bind(req.resolve_weight_limit(existing.weight_limit))
        .bind(req.format.unwrap_or(existing.format))
        .bind(req.time_limit.unwrap_or(existing.time_limit))
        .bind(req.status.unwrap_or(existing.status))
        .bind(req.match_order.unwrap_or(existing.match_order))
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event_match)
    }

    pub async fn delete(&self, match_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM event_matches WHERE match_id = $1")
            .bind(match_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    pub async fn list_competitors(&self, match_id: Uuid) -> Result<Vec<Competitor>> {
        let competitors = sqlx::query_as::<_, Competitor>(
            r#"
            SELECT competitor_id, match_id, position, competitor_type, user_id,
                   manual_name, confirmed, created_at
            FROM event_match_competitors
            WHERE match_id = $1
            ORDER BY position
            "#,
        )
        .bind(match_id)
        .fetch_all(self.pool)
        .await?;

        Ok(competitors)
    }

    /// Competitors of every match of an event, for building the event card in
    /// one round trip
    pub async fn list_competitors_for_event(&self, event_id: Uuid) -> Result<Vec<Competitor>> {
        let competitors = sqlx::query_as::<_, Competitor>(
            r#"
            SELECT c.competitor_id, c.match_id, c.position, c.competitor_type, c.user_id,
                   c.manual_name, c.confirmed, c.created_at
            FROM event_match_competitors c
            INNER JOIN event_matches m ON m.match_id = c.match_id
            WHERE m.event_id = $1
            ORDER BY c.match_id, c.position
            "#,
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(competitors)
    }
}
