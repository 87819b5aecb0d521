//! Bizflow API: HTTP host for the reactive core.
//!
//! Exposes the publish surface and the read-only introspection surface
//! (events, propagation results, agent batches) over JSON.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/events", routes::events::router())
        .nest("/api/v1/propagation", routes::propagation::router())
        .nest("/api/v1/agents", routes::agents::router())
        .with_state(state)
}
