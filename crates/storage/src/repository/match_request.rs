use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{
    Competitor, EventMatch, MatchContext, MatchRequest, NewMatchRequest, RequestKind,
    SlotPosition,
};
use crate::repository::event_match::MatchRepository;
use crate::services::match_workflow::{AcceptOutcome, MatchWorkflowStore};

const COMPETITOR_USER_CONSTRAINT: &str = "uq_competitor_user";

/// Repository for match requests and invites.
///
/// Also the Postgres implementation of [`MatchWorkflowStore`]: every write
/// touching both a request and a competitor runs in a single transaction.
pub struct MatchRequestRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MatchRequestRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_by_match(&self, match_id: Uuid) -> Result<Vec<MatchRequest>> {
        let requests = sqlx::query_as::<_, MatchRequest>(
            r#"
            SELECT request_id, match_id, user_id, requested_by, position, status, kind,
                   message, created_at, responded_at, responded_by
            FROM event_match_requests
            WHERE match_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(match_id)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Requests of a match that concern `user_id`, either as target or sender
    pub async fn list_by_match_for_user(
        &self,
        match_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<MatchRequest>> {
        let requests = sqlx::query_as::<_, MatchRequest>(
            r#"
            SELECT request_id, match_id, user_id, requested_by, position, status, kind,
                   message, created_at, responded_at, responded_by
            FROM event_match_requests
            WHERE match_id = $1 AND (user_id = $2 OR requested_by = $2)
            ORDER BY created_at
            "#,
        )
        .bind(match_id)
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }

    /// Every request and invite targeting `user_id`, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<MatchRequest>> {
        let requests = sqlx::query_as::<_, MatchRequest>(
            r#"
            SELECT request_id, match_id, user_id, requested_by, position, status, kind,
                   message, created_at, responded_at, responded_by
            FROM event_match_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(requests)
    }
}

#[async_trait]
impl<'a> MatchWorkflowStore for MatchRequestRepository<'a> {
    async fn match_context(&self, match_id: Uuid) -> Result<MatchContext> {
        let context = sqlx::query_as::<_, MatchContext>(
            r#"
            SELECT m.match_id, m.event_id, e.organizer_id, e.open_requests, m.status
            FROM event_matches m
            INNER JOIN events e ON e.event_id = m.event_id
            WHERE m.match_id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(context)
    }

    async fn find_request(&self, request_id: Uuid) -> Result<MatchRequest> {
        let request = sqlx::query_as::<_, MatchRequest>(
            r#"
            SELECT request_id, match_id, user_id, requested_by, position, status, kind,
                   message, created_at, responded_at, responded_by
            FROM event_match_requests
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(request)
    }

    async fn find_slot_request(
        &self,
        match_id: Uuid,
        user_id: Uuid,
        position: SlotPosition,
    ) -> Result<Option<MatchRequest>> {
        let request = sqlx::query_as::<_, MatchRequest>(
            r#"
            SELECT request_id, match_id, user_id, requested_by, position, status, kind,
                   message, created_at, responded_at, responded_by
            FROM event_match_requests
            WHERE match_id = $1 AND user_id = $2 AND position = $3
            "#,
        )
        .bind(match_id)
        .bind(user_id)
        .bind(position)
        .fetch_optional(self.pool)
        .await?;

        Ok(request)
    }

    async fn competitors(&self, match_id: Uuid) -> Result<Vec<Competitor>> {
        MatchRepository::new(self.pool)
            .list_competitors(match_id)
            .await
    }

    async fn find_competitor(&self, competitor_id: Uuid) -> Result<Competitor> {
        let competitor = sqlx::query_as::<_, Competitor>(
            r#"
            SELECT competitor_id, match_id, position, competitor_type, user_id,
                   manual_name, confirmed, created_at
            FROM event_match_competitors
            WHERE competitor_id = $1
            "#,
        )
        .bind(competitor_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competitor)
    }

    async fn insert_request(&self, request: &NewMatchRequest) -> Result<Option<MatchRequest>> {
        let inserted = sqlx::query_as::<_, MatchRequest>(
            r#"
            INSERT INTO event_match_requests (
                match_id, user_id, requested_by, position, status, kind, message
            )
            VALUES ($1, $2, $3, $4, 'pending', $5, $6)
            RETURNING request_id, match_id, user_id, requested_by, position, status, kind,
                      message, created_at, responded_at, responded_by
            "#,
        )
        .bind(request.match_id)
        .bind(request.user_id)
        .bind(request.requested_by)
        .bind(request.position)
        .bind(request.kind)
        .bind(&request.message)
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(Some(row)),
            Err(e) => {
                let error = StorageError::from(e);
                if error.is_unique_violation() {
                    Ok(None)
                } else if error.is_foreign_key_violation() {
                    Err(StorageError::ConstraintViolation(
                        "User has no profile".to_string(),
                    ))
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn reopen_request(
        &self,
        request_id: Uuid,
        kind: RequestKind,
        requested_by: Uuid,
        message: Option<&str>,
    ) -> Result<Option<MatchRequest>> {
        let reopened = sqlx::query_as::<_, MatchRequest>(
            r#"
            UPDATE event_match_requests
            SET
                status = 'pending',
                kind = $2,
                requested_by = $3,
                message = $4,
                responded_at = NULL,
                responded_by = NULL
            WHERE request_id = $1 AND status = 'rejected'
            RETURNING request_id, match_id, user_id, requested_by, position, status, kind,
                      message, created_at, responded_at, responded_by
            "#,
        )
        .bind(request_id)
        .bind(kind)
        .bind(requested_by)
        .bind(message)
        .fetch_optional(self.pool)
        .await?;

        Ok(reopened)
    }

    async fn accept_request(&self, request_id: Uuid, responder: Uuid) -> Result<AcceptOutcome> {
        let mut tx = self.pool.begin().await?;

        let accepted = sqlx::query_as::<_, MatchRequest>(
            r#"
            UPDATE event_match_requests
            SET status = 'accepted', responded_at = NOW(), responded_by = $2
            WHERE request_id = $1 AND status = 'pending'
            RETURNING request_id, match_id, user_id, requested_by, position, status, kind,
                      message, created_at, responded_at, responded_by
            "#,
        )
        .bind(request_id)
        .bind(responder)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back
        let Some(request) = accepted else {
            return Ok(AcceptOutcome::NotPending);
        };

        let inserted = sqlx::query_as::<_, Competitor>(
            r#"
            INSERT INTO event_match_competitors (
                match_id, position, competitor_type, user_id, confirmed
            )
            VALUES ($1, $2, 'user', $3, TRUE)
            RETURNING competitor_id, match_id, position, competitor_type, user_id,
                      manual_name, confirmed, created_at
            "#,
        )
        .bind(request.match_id)
        .bind(request.position)
        .bind(request.user_id)
        .fetch_one(&mut *tx)
        .await;

        let competitor = match inserted {
            Ok(competitor) => competitor,
            Err(e) => {
                let error = StorageError::from(e);
                if error.is_unique_violation() {
                    return Ok(match error.constraint() {
                        Some(COMPETITOR_USER_CONSTRAINT) => AcceptOutcome::UserSeated,
                        _ => AcceptOutcome::SlotTaken,
                    });
                }
                return Err(error);
            }
        };

        tx.commit().await?;

        Ok(AcceptOutcome::Accepted {
            request,
            competitor,
        })
    }

    async fn reject_request(
        &self,
        request_id: Uuid,
        responder: Uuid,
    ) -> Result<Option<MatchRequest>> {
        let rejected = sqlx::query_as::<_, MatchRequest>(
            r#"
            UPDATE event_match_requests
            SET status = 'rejected', responded_at = NOW(), responded_by = $2
            WHERE request_id = $1 AND status = 'pending'
            RETURNING request_id, match_id, user_id, requested_by, position, status, kind,
                      message, created_at, responded_at, responded_by
            "#,
        )
        .bind(request_id)
        .bind(responder)
        .fetch_optional(self.pool)
        .await?;

        Ok(rejected)
    }

    async fn delete_pending_request(&self, request_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM event_match_requests WHERE request_id = $1 AND status = 'pending'",
        )
        .bind(request_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_manual_competitor(
        &self,
        match_id: Uuid,
        position: SlotPosition,
        name: &str,
    ) -> Result<Option<Competitor>> {
        let inserted = sqlx::query_as::<_, Competitor>(
            r#"
            INSERT INTO event_match_competitors (
                match_id, position, competitor_type, manual_name, confirmed
            )
            VALUES ($1, $2, 'manual', $3, FALSE)
            RETURNING competitor_id, match_id, position, competitor_type, user_id,
                      manual_name, confirmed, created_at
            "#,
        )
        .bind(match_id)
        .bind(position)
        .bind(name)
        .fetch_one(self.pool)
        .await;

        match inserted {
            Ok(competitor) => Ok(Some(competitor)),
            Err(e) => {
                let error = StorageError::from(e);
                if error.is_unique_violation() {
                    Ok(None)
                } else {
                    Err(error)
                }
            }
        }
    }

    async fn remove_competitor(&self, competitor: &Competitor) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if let Some(user_id) = competitor.user_id {
            sqlx::query(
                r#"
                DELETE FROM event_match_requests
                WHERE match_id = $1 AND position = $2 AND user_id = $3
                "#,
            )
            .bind(competitor.match_id)
            .bind(competitor.position)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let result = sqlx::query("DELETE FROM event_match_competitors WHERE competitor_id = $1")
            .bind(competitor.competitor_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn confirm_match(&self, match_id: Uuid) -> Result<EventMatch> {
        let mut tx = self.pool.begin().await?;

        let confirmed = sqlx::query_as::<_, EventMatch>(
            r#"
            UPDATE event_matches
            SET status = 'confirmed'
            WHERE match_id = $1
            RETURNING match_id, event_id, belt_level, gender, weight_limit, format,
                      time_limit, status, match_order, created_at
            "#,
        )
        .bind(match_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        sqlx::query("UPDATE event_match_competitors SET confirmed = TRUE WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(confirmed)
    }
}
