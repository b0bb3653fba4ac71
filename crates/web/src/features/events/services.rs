use sqlx::PgPool;
use std::collections::HashMap;
use storage::{
    dto::{
        common::PaginationParams,
        event::{CreateEventRequest, UpdateEventRequest},
        event_match::{CreateEventMatchRequest, MatchDetail},
    },
    models::{Competitor, Event, EventMatch},
    repository::{event::EventRepository, event_match::MatchRepository},
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// List events, newest first
pub async fn list_events(pool: &PgPool, pagination: &PaginationParams) -> WebResult<(Vec<Event>, i64)> {
    let repo = EventRepository::new(pool);
    Ok(repo.list(pagination).await?)
}

/// Get an event with its matches and their competitors
pub async fn get_event_detailed(pool: &PgPool, slug: &str) -> WebResult<(Event, Vec<MatchDetail>)> {
    let event = EventRepository::new(pool).find_by_slug(slug).await?;

    let match_repo = MatchRepository::new(pool);
    let matches = match_repo.list_by_event(event.event_id).await?;
    let competitors = match_repo.list_competitors_for_event(event.event_id).await?;

    Ok((event, attach_competitors(matches, competitors)))
}

fn attach_competitors(matches: Vec<EventMatch>, competitors: Vec<Competitor>) -> Vec<MatchDetail> {
    let mut by_match: HashMap<Uuid, Vec<Competitor>> = HashMap::new();
    for competitor in competitors {
        by_match.entry(competitor.match_id).or_default().push(competitor);
    }

    matches
        .into_iter()
        .map(|event_match| {
            let seated = by_match.remove(&event_match.match_id).unwrap_or_default();
            MatchDetail::new(event_match, seated)
        })
        .collect()
}

/// Create an event organized by the caller
pub async fn create_event(
    pool: &PgPool,
    organizer_id: Uuid,
    request: &CreateEventRequest,
) -> WebResult<Event> {
    let event = EventRepository::new(pool).create(organizer_id, request).await?;
    tracing::info!(event_id = %event.event_id, %organizer_id, "Event created");
    Ok(event)
}

/// Update an event, organizer only
pub async fn update_event(
    pool: &PgPool,
    actor: Uuid,
    slug: &str,
    request: &UpdateEventRequest,
) -> WebResult<Event> {
    let repo = EventRepository::new(pool);

    let existing = repo.find_by_slug(slug).await?;
    ensure_organizer(&existing, actor)?;

    Ok(repo.update(&existing, request).await?)
}

/// Delete an event with all its matches, organizer only
pub async fn delete_event(pool: &PgPool, actor: Uuid, slug: &str) -> WebResult<()> {
    let repo = EventRepository::new(pool);

    let event = repo.find_by_slug(slug).await?;
    ensure_organizer(&event, actor)?;

    repo.delete(event.event_id).await?;
    tracing::info!(event_id = %event.event_id, "Event deleted");
    Ok(())
}

/// Add a match to an event's card, organizer only
pub async fn create_match(
    pool: &PgPool,
    actor: Uuid,
    slug: &str,
    request: &CreateEventMatchRequest,
) -> WebResult<EventMatch> {
    let event = EventRepository::new(pool).find_by_slug(slug).await?;
    ensure_organizer(&event, actor)?;

    Ok(MatchRepository::new(pool).create(event.event_id, request).await?)
}

pub(crate) fn ensure_organizer(event: &Event, actor: Uuid) -> WebResult<()> {
    if event.is_organizer(actor) {
        Ok(())
    } else {
        Err(WebError::Forbidden(
            "Only the event organizer can modify this event".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::{CompetitorType, MatchFormat, MatchStatus, SlotPosition};

    fn event_match(match_order: i32) -> EventMatch {
        EventMatch {
            match_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            belt_level: "blue".to_string(),
            gender: "male".to_string(),
            weight_limit: None,
            format: MatchFormat::Gi,
            time_limit: 6,
            status: MatchStatus::Pending,
            match_order,
            created_at: chrono_now(),
        }
    }

    fn competitor(match_id: Uuid, position: SlotPosition) -> Competitor {
        Competitor {
            competitor_id: Uuid::new_v4(),
            match_id,
            position,
            competitor_type: CompetitorType::Manual,
            user_id: None,
            manual_name: Some("Guest".to_string()),
            confirmed: false,
            created_at: chrono_now(),
        }
    }

    fn chrono_now() -> chrono::NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }

    #[test]
    fn test_attach_competitors_groups_by_match_and_keeps_order() {
        let first = event_match(1);
        let second = event_match(2);
        let competitors = vec![
            competitor(first.match_id, SlotPosition::FIRST),
            competitor(first.match_id, SlotPosition::SECOND),
            competitor(Uuid::new_v4(), SlotPosition::FIRST),
        ];

        let details = attach_competitors(vec![first.clone(), second.clone()], competitors);

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].event_match.match_id, first.match_id);
        assert_eq!(details[0].competitors.len(), 2);
        assert_eq!(details[1].event_match.match_id, second.match_id);
        assert!(details[1].competitors.is_empty());
    }

    #[test]
    fn test_only_organizer_passes_check() {
        let organizer_id = Uuid::new_v4();
        let event = Event {
            event_id: Uuid::new_v4(),
            organizer_id,
            name: "Spring Open".to_string(),
            slug: "spring-open".to_string(),
            description: None,
            location: None,
            event_date: None,
            open_requests: true,
            created_at: chrono_now(),
        };

        assert!(ensure_organizer(&event, organizer_id).is_ok());
        assert!(matches!(
            ensure_organizer(&event, Uuid::new_v4()),
            Err(WebError::Forbidden(_))
        ));
    }
}
