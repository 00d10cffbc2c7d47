//! Recurrence rule endpoints

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};

use datebook_core::{DatebookError, Interval, RecurrenceRule, timestamp};

use crate::routes::{ApiResult, AppError, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/events/{id}/recurrence",
        get(get_rule).put(put_rule).delete(delete_rule),
    )
}

#[derive(Deserialize)]
pub struct RuleRequest {
    pub interval: String,
    pub times: u32,
    pub end_date: Option<String>,
}

/// Rule currently in effect for an event.
#[derive(Serialize)]
pub struct RuleState {
    pub event_id: u64,
    pub rule: Option<RecurrenceRule>,
}

/// GET /events/:id/recurrence
async fn get_rule(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<RuleState> {
    let rule = state.datebook().recurrence(id)?;
    let message = if rule.is_some() {
        "Recurrence rule found"
    } else {
        "Event does not repeat"
    };
    ok(message, RuleState { event_id: id, rule })
}

/// PUT /events/:id/recurrence - Set the rule. A non-repeating rule leaves
/// any existing rule in place; use DELETE to clear it.
async fn put_rule(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    payload: Result<Json<RuleRequest>, JsonRejection>,
) -> ApiResult<RuleState> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;

    let interval: Interval = req.interval.parse()?;
    let end_date = req
        .end_date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(timestamp::parse_date)
        .transpose()?;

    let mut rule = RecurrenceRule::new(id, interval, req.times);
    rule.end_date = end_date;
    let repeating = rule.is_repeating();

    let rule = state.datebook().set_recurrence(rule)?;
    let message = if repeating {
        "Recurrence rule saved"
    } else {
        "Rule does not repeat; nothing saved"
    };
    ok(message, RuleState { event_id: id, rule })
}

/// DELETE /events/:id/recurrence
async fn delete_rule(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<RuleState> {
    if !state.datebook().clear_recurrence(id)? {
        return Err(DatebookError::not_found("Recurrence rule", id).into());
    }
    ok("Recurrence rule removed", RuleState { event_id: id, rule: None })
}
