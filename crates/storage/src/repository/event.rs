use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::PaginationParams;
use crate::dto::event::{CreateEventRequest, UpdateEventRequest};
use crate::error::{Result, StorageError, map_write_error};
use crate::models::Event;

/// Repository for Event database operations
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of events, latest date first, with the total count
    pub async fn list(&self, pagination: &PaginationParams) -> Result<(Vec<Event>, i64)> {
        let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(self.pool)
            .await?;

        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, organizer_id, name, slug, description, location,
                   event_date, open_requests, created_at
            FROM events
            ORDER BY event_date DESC NULLS LAST, created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok((events, total_items))
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT event_id, organizer_id, name, slug, description, location,
                   event_date, open_requests, created_at
            FROM events
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn create(&self, organizer_id: Uuid, req: &CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                organizer_id, name, slug, description, location, event_date, open_requests
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING event_id, organizer_id, name, slug, description, location,
                      event_date, open_requests, created_at
            "#,
        )
        .bind(organizer_id)
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&req.description)
        .bind(&req.location)
        .bind(req.event_date)
        .bind(req.open_requests)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                "Slug already exists",
                "Create your profile before organizing events",
            )
        })?;

        Ok(event)
    }

    /// Apply the fields present in `req` on top of `existing`
    pub async fn update(&self, existing: &Event, req: &UpdateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
                name = $2,
                slug = $3,
                description = $4,
                location = $5,
                event_date = $6,
                open_requests = $7
            WHERE event_id = $1
            RETURNING event_id, organizer_id, name, slug, description, location,
                      event_date, open_requests, created_at
            "#,
        )
        .bind(existing.event_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.slug.as_ref().unwrap_or(&existing.slug))
        .bind(req.description.as_ref().or(existing.description.as_ref()))
        .bind(req.location.as_ref().or(existing.location.as_ref()))
        .bind(req.event_date.or(existing.event_date))
        .bind(req.open_requests.unwrap_or(existing.open_requests))
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_write_error(e, "Slug already exists", "Unknown organizer"))?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
