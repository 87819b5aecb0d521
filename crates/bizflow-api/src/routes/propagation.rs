//! Routes for the propagation engine.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use bizflow_propagation::domain::results::PropagationResult;
use bizflow_propagation::domain::rules::RuleSummary;
use tracing::{info, instrument};

use super::{LimitQuery, SetEnabledRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /results
async fn list_results(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<PropagationResult>> {
    Json(state.core.propagation().recent_results(query.limit()))
}

/// GET /rules
async fn list_rules(State(state): State<AppState>) -> Json<Vec<RuleSummary>> {
    Json(state.core.propagation().rules())
}

/// PUT /rules/{id}/enabled
#[instrument(skip(state, request), fields(rule_id = %rule_id, enabled = request.enabled))]
async fn set_rule_enabled(
    State(state): State<AppState>,
    Path(rule_id): Path<String>,
    Json(request): Json<SetEnabledRequest>,
) -> Result<Json<RuleSummary>, ApiError> {
    let summary = state
        .core
        .propagation()
        .set_rule_enabled(&rule_id, request.enabled)?;

    info!("propagation rule updated");

    Ok(Json(summary))
}

/// Returns the router for the propagation engine.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/results", get(list_results))
        .route("/rules", get(list_rules))
        .route("/rules/{id}/enabled", put(set_rule_enabled))
}
