//! User endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;

use datebook_core::{DatebookError, NewUser, User};

use crate::routes::{ApiResult, AppError, created, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(find_by_email).post(register))
        .route("/users/{id}", get(get_user))
}

/// POST /users - Register a user
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<User> {
    let Json(new) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let user = state.datebook().register(new)?;
    created("User registered", user)
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// GET /users?email= - Look a user up by email, ignoring case
async fn find_by_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> ApiResult<User> {
    let user = state
        .datebook()
        .users()
        .find_by_email(&query.email)
        .ok_or_else(|| AppError::not_found(format!("No user with email {}", query.email.trim())))?;
    ok("User found", user)
}

/// GET /users/:id
async fn get_user(State(state): State<AppState>, Path(id): Path<u64>) -> ApiResult<User> {
    let user = state
        .datebook()
        .users()
        .find_by_id(id)
        .ok_or_else(|| DatebookError::not_found("User", id))?;
    ok("User found", user)
}
