//! HTTP adapter over a datebook data directory.

pub mod routes;
pub mod singleton;
pub mod state;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

/// Build the full router for `state`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::events::router())
        .merge(routes::recurrence::router())
        .merge(routes::users::router())
        .merge(routes::stats::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
