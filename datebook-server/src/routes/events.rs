//! Event endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};

use datebook_core::date_range::DateRange;
use datebook_core::timestamp;
use datebook_core::{
    Category, Event, EventFilter, Interval, NewEvent, Occurrence, RecurrenceRule, Repeat,
};

use crate::routes::{ApiResult, AppError, MaybeSession, created, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/expanded", get(list_expanded))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/categories/{category}/events", get(list_by_category))
}

/// Request body for creating or replacing an event.
///
/// `user_id` may be omitted when the request carries an `X-User-Id` header.
#[derive(Deserialize)]
pub struct EventRequest {
    pub user_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub repeat: Option<RepeatRequest>,
}

#[derive(Deserialize)]
pub struct RepeatRequest {
    pub interval: String,
    pub times: u32,
    pub until: Option<String>,
}

impl EventRequest {
    /// Parse every field, reporting all problems at once.
    fn into_new_event(self, session: MaybeSession) -> Result<(NewEvent, Option<Repeat>), AppError> {
        let mut errors = Vec::new();

        let user_id = self.user_id.or(session.0.map(|s| s.user_id));
        if user_id.is_none() {
            errors.push("user_id is required (in the body or the X-User-Id header)".to_string());
        }

        let start = timestamp::parse(&self.start).map_err(|e| errors.push(e.to_string())).ok();
        let end = timestamp::parse(&self.end).map_err(|e| errors.push(e.to_string())).ok();
        let category = match self.category.as_deref() {
            Some(raw) => raw
                .parse::<Category>()
                .map_err(|e| errors.push(e.to_string()))
                .ok(),
            None => Some(Category::default()),
        };
        let repeat = self.repeat.and_then(|r| r.parse().map_err(|e| errors.extend(e)).ok());

        match (user_id, start, end, category) {
            (Some(user_id), Some(start), Some(end), Some(category)) if errors.is_empty() => {
                let new = NewEvent::new(user_id, self.title, start, end, category)
                    .with_description(self.description);
                Ok((new, repeat))
            }
            _ => Err(datebook_core::DatebookError::Validation(errors).into()),
        }
    }
}

impl RepeatRequest {
    fn parse(self) -> Result<Repeat, Vec<String>> {
        let interval = self.interval.parse::<Interval>().map_err(|e| vec![e.to_string()])?;
        let until = self
            .until
            .as_deref()
            .map(timestamp::parse_date)
            .transpose()
            .map_err(|e| vec![e.to_string()])?;
        Ok(Repeat {
            interval,
            times: self.times,
            until,
        })
    }
}

/// An event together with the rule now in effect for it.
#[derive(Serialize)]
pub struct SavedEvent {
    pub event: Event,
    pub recurrence: Option<RecurrenceRule>,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /events - Base events, limited to the session's user when present
async fn list_events(
    State(state): State<AppState>,
    session: MaybeSession,
) -> ApiResult<Vec<Event>> {
    let store = state.datebook().events();
    let events = match session.0 {
        Some(session) => store.find_by_user(session.user_id),
        None => store.list(),
    };

    ok(format!("{} events", events.len()), events)
}

/// GET /events/expanded - Base events joined with their generated occurrences
async fn list_expanded(
    State(state): State<AppState>,
    session: MaybeSession,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Vec<Occurrence>> {
    let range = DateRange::from_args(query.from.as_deref(), query.to.as_deref())?;
    let filter = EventFilter {
        user_id: session.0.map(|s| s.user_id),
        ..Default::default()
    }
    .within(range);

    let occurrences = state.datebook().events_with_occurrences(&filter);
    ok(format!("{} occurrences", occurrences.len()), occurrences)
}

/// GET /events/:id
async fn get_event(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Event> {
    let event = state.datebook().event(id)?;
    ok("Event found", event)
}

/// POST /events - Create an event, optionally with a recurrence rule
async fn create_event(
    State(state): State<AppState>,
    session: MaybeSession,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<SavedEvent> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let (new, repeat) = req.into_new_event(session)?;

    let datebook = state.datebook();
    let (event, recurrence) = match repeat {
        Some(repeat) => datebook.create_repeating_event(new, repeat)?,
        None => (datebook.create_event(new)?, None),
    };

    created("Event created", SavedEvent { event, recurrence })
}

/// PUT /events/:id - Replace every field of an event, and its rule when
/// `repeat` is given
async fn update_event(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(id): Path<u64>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> ApiResult<SavedEvent> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let (new, repeat) = req.into_new_event(session)?;

    let datebook = state.datebook();
    let (event, recurrence) = match repeat {
        Some(repeat) => datebook.update_repeating_event(id, new, repeat)?,
        None => {
            let event = datebook.update_event(id, new)?;
            let recurrence = datebook.rules().get(id);
            (event, recurrence)
        }
    };

    ok("Event updated", SavedEvent { event, recurrence })
}

#[derive(Serialize)]
pub struct Deleted {
    pub id: u64,
}

/// DELETE /events/:id
async fn delete_event(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<Deleted> {
    if !state.datebook().delete_event(id)? {
        return Err(datebook_core::DatebookError::not_found("Event", id).into());
    }
    ok("Event deleted", Deleted { id })
}

/// GET /categories/:category/events
async fn list_by_category(
    State(state): State<AppState>,
    session: MaybeSession,
    Path(category): Path<String>,
) -> ApiResult<Vec<Event>> {
    let category: Category = category.parse()?;
    let events: Vec<Event> = state
        .datebook()
        .events()
        .find_by_category(category)
        .into_iter()
        .filter(|e| session.0.is_none_or(|s| s.owns(e.user_id)))
        .collect();

    ok(format!("{} {} events", events.len(), category), events)
}
