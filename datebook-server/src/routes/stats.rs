//! Statistics and health endpoints

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use datebook_core::EndDatePolicy;
use datebook_core::stats::Stats;

use crate::routes::{ApiResult, RequireSession, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats))
        .route("/health", get(health))
}

/// GET /stats - Event counts for the session's user
async fn stats(State(state): State<AppState>, RequireSession(session): RequireSession) -> ApiResult<Stats> {
    let stats = state.datebook().stats(session)?;
    ok("Statistics", stats)
}

#[derive(Serialize)]
pub struct Health {
    pub events: usize,
    pub users: usize,
    pub end_date_policy: EndDatePolicy,
}

/// GET /health
async fn health(State(state): State<AppState>) -> ApiResult<Health> {
    let datebook = state.datebook();
    ok(
        "ok",
        Health {
            events: datebook.events().len(),
            users: datebook.users().list().len(),
            end_date_policy: datebook.end_date_policy(),
        },
    )
}
