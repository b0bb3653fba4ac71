//! Workflow tests against the Postgres store, where the unique slot
//! constraints and transaction rollbacks are enforced by the database.
//!
//! Each test gets a fresh migrated database from `DATABASE_URL`.

use sqlx::PgPool;
use storage::dto::event::CreateEventRequest;
use storage::dto::event_match::CreateEventMatchRequest;
use storage::dto::profile::UpsertProfileRequest;
use storage::models::{MatchFormat, MatchStatus, RequestStatus, SlotPosition};
use storage::repository::event::EventRepository;
use storage::repository::event_match::MatchRepository;
use storage::repository::match_request::MatchRequestRepository;
use storage::repository::profile::ProfileRepository;
use storage::services::match_workflow::{MatchWorkflow, WorkflowError};
use uuid::Uuid;

async fn profile(pool: &PgPool, username: &str) -> Uuid {
    let id = Uuid::new_v4();
    let req = UpsertProfileRequest {
        username: username.to_string(),
        full_name: None,
        belt: Some("purple".to_string()),
        avatar_url: None,
    };
    ProfileRepository::new(pool).upsert(id, &req).await.unwrap();
    id
}

/// An open-request event owned by `organizer` holding one pending match
async fn open_match(pool: &PgPool, organizer: Uuid) -> Uuid {
    let event = EventRepository::new(pool)
        .create(
            organizer,
            &CreateEventRequest {
                name: "Copa Guarda Fechada".to_string(),
                slug: "copa-guarda-fechada".to_string(),
                description: None,
                location: Some("Lisbon".to_string()),
                event_date: None,
                open_requests: true,
            },
        )
        .await
        .unwrap();

    let event_match = MatchRepository::new(pool)
        .create(
            event.event_id,
            &CreateEventMatchRequest {
                belt_level: "purple".to_string(),
                gender: "female".to_string(),
                weight_limit: None,
                format: MatchFormat::Gi,
                time_limit: 6,
                match_order: 1,
            },
        )
        .await
        .unwrap();

    event_match.match_id
}

async fn request_status(pool: &PgPool, request_id: Uuid) -> RequestStatus {
    sqlx::query_scalar("SELECT status FROM event_match_requests WHERE request_id = $1")
        .bind(request_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore] // Only run when DATABASE_URL points at a Postgres server
async fn test_second_approval_for_filled_slot_rolls_back(pool: PgPool) {
    let organizer = profile(&pool, "organizer").await;
    let ana = profile(&pool, "ana_silva").await;
    let bruno = profile(&pool, "bruno.lima").await;
    let match_id = open_match(&pool, organizer).await;
    let workflow = MatchWorkflow::new(MatchRequestRepository::new(&pool));

    let first = workflow
        .submit_request(ana, match_id, SlotPosition::FIRST, None)
        .await
        .unwrap();
    let second = workflow
        .submit_request(bruno, match_id, SlotPosition::FIRST, None)
        .await
        .unwrap();

    workflow
        .approve_request(organizer, first.request_id)
        .await
        .unwrap();
    let err = workflow
        .approve_request(organizer, second.request_id)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::SlotFilled(SlotPosition::FIRST)));
    assert_eq!(request_status(&pool, second.request_id).await, RequestStatus::Pending);

    let competitors = MatchRepository::new(&pool)
        .list_competitors(match_id)
        .await
        .unwrap();
    assert_eq!(competitors.len(), 1);
    assert_eq!(competitors[0].user_id, Some(ana));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore] // Only run when DATABASE_URL points at a Postgres server
async fn test_user_cannot_be_seated_twice(pool: PgPool) {
    let organizer = profile(&pool, "organizer").await;
    let ana = profile(&pool, "ana_silva").await;
    let match_id = open_match(&pool, organizer).await;
    let workflow = MatchWorkflow::new(MatchRequestRepository::new(&pool));

    let first = workflow
        .submit_request(ana, match_id, SlotPosition::FIRST, None)
        .await
        .unwrap();
    let second = workflow
        .submit_request(ana, match_id, SlotPosition::SECOND, None)
        .await
        .unwrap();

    workflow
        .approve_request(organizer, first.request_id)
        .await
        .unwrap();
    let err = workflow
        .approve_request(organizer, second.request_id)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::AlreadyCompeting));
    assert_eq!(request_status(&pool, second.request_id).await, RequestStatus::Pending);

    let competitors = MatchRepository::new(&pool)
        .list_competitors(match_id)
        .await
        .unwrap();
    assert_eq!(competitors.len(), 1);
    assert_eq!(competitors[0].position, SlotPosition::FIRST);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore] // Only run when DATABASE_URL points at a Postgres server
async fn test_removing_competitor_deletes_seating_request(pool: PgPool) {
    let organizer = profile(&pool, "organizer").await;
    let ana = profile(&pool, "ana_silva").await;
    let match_id = open_match(&pool, organizer).await;
    let workflow = MatchWorkflow::new(MatchRequestRepository::new(&pool));

    let request = workflow
        .submit_request(ana, match_id, SlotPosition::SECOND, Some("Ready to roll".to_string()))
        .await
        .unwrap();
    let (_, competitor) = workflow
        .approve_request(organizer, request.request_id)
        .await
        .unwrap();

    workflow
        .remove_competitor(organizer, match_id, competitor.competitor_id)
        .await
        .unwrap();

    let competitors = MatchRepository::new(&pool)
        .list_competitors(match_id)
        .await
        .unwrap();
    assert!(competitors.is_empty());

    let requests = MatchRequestRepository::new(&pool)
        .list_by_match(match_id)
        .await
        .unwrap();
    assert!(requests.is_empty());

    // The slot is open again for the same user
    workflow
        .submit_request(ana, match_id, SlotPosition::SECOND, None)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore] // Only run when DATABASE_URL points at a Postgres server
async fn test_confirm_marks_every_competitor(pool: PgPool) {
    let organizer = profile(&pool, "organizer").await;
    let match_id = open_match(&pool, organizer).await;
    let workflow = MatchWorkflow::new(MatchRequestRepository::new(&pool));

    workflow
        .add_manual_competitor(organizer, match_id, SlotPosition::FIRST, "Helena Costa")
        .await
        .unwrap();

    let confirmed = workflow.confirm_match(organizer, match_id).await.unwrap();
    assert_eq!(confirmed.status, MatchStatus::Confirmed);

    let competitors = MatchRepository::new(&pool)
        .list_competitors(match_id)
        .await
        .unwrap();
    assert_eq!(competitors.len(), 1);
    assert!(competitors.iter().all(|c| c.confirmed));
}
