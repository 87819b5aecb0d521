//! Routes for the agent orchestrator.

use axum::extract::{Path, Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use bizflow_agents::domain::agent::AgentSummary;
use bizflow_agents::domain::response::ResponseBatch;
use tracing::{info, instrument};

use super::{LimitQuery, SetEnabledRequest};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /
async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentSummary>> {
    Json(state.core.agents().agents())
}

/// GET /batches
async fn list_batches(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<ResponseBatch>> {
    Json(state.core.agents().recent_batches(query.limit()))
}

/// PUT /{id}/enabled
#[instrument(skip(state, request), fields(agent_id = %agent_id, enabled = request.enabled))]
async fn set_agent_enabled(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
    Json(request): Json<SetEnabledRequest>,
) -> Result<Json<AgentSummary>, ApiError> {
    let summary = state
        .core
        .agents()
        .set_agent_enabled(&agent_id, request.enabled)?;

    info!("agent updated");

    Ok(Json(summary))
}

/// Returns the router for the agent orchestrator.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_agents))
        .route("/batches", get(list_batches))
        .route("/{id}/enabled", put(set_agent_enabled))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bizflow_agents::application::default_agents::default_agents;
    use bizflow_core::catalogue::EventPayload;
    use bizflow_core::event::PublishOptions;
    use bizflow_core::mutation::MutationSink;
    use bizflow_core::payload::ProductPayload;
    use bizflow_runtime::{CoreConfig, ReactiveCore};
    use bizflow_test_support::{FixedClock, RecordingMutationSink, ScriptedCompletionService};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app_state_replying(replies: &[&str]) -> AppState {
        let mutations: Arc<dyn MutationSink> = Arc::new(RecordingMutationSink::new());
        let core = ReactiveCore::start_with_agents(
            &CoreConfig::default(),
            Arc::new(FixedClock::default()),
            Arc::new(ScriptedCompletionService::replying(replies.iter().copied())),
            &mutations,
            default_agents(),
        );
        AppState::new(Arc::new(core))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        (status, json)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn put_enabled(uri: &str, enabled: bool) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&json!({ "enabled": enabled })).unwrap(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_agents_omits_system_prompt() {
        let app = router().with_state(app_state_replying(&[]));

        let (status, json) = send(app, get_request("/")).await;

        assert_eq!(status, StatusCode::OK);
        let agents = json.as_array().unwrap();
        assert_eq!(agents.len(), 5);
        assert_eq!(agents[0]["id"], "sales-agent");
        assert!(agents[0].get("system_prompt").is_none());
    }

    #[tokio::test]
    async fn test_batches_contain_agent_responses() {
        // Arrange
        let state = app_state_replying(&["Reorder 200 units this week."]);
        state
            .core
            .publish(
                EventPayload::ProductLowStock(ProductPayload {
                    product_id: Uuid::new_v4(),
                    sku: "WIDGET-1".into(),
                    name: "Widget".into(),
                    quantity_on_hand: 4,
                    reorder_level: 20,
                }),
                PublishOptions::default(),
            )
            .await
            .unwrap();

        // Act
        let (status, json) = send(router().with_state(state), get_request("/batches")).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let batches = json.as_array().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0]["event_type"], "inventory.product.lowStock");
        let response = &batches[0]["responses"][0];
        assert_eq!(response["agent_id"], "inventory-agent");
        assert_eq!(response["analysis"], "Reorder 200 units this week.");
        assert_eq!(response["mode"], "raw_text");
    }

    #[tokio::test]
    async fn test_disable_agent_returns_summary() {
        let state = app_state_replying(&[]);

        let (status, json) = send(
            router().with_state(state.clone()),
            put_enabled("/finance-agent/enabled", false),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "finance-agent");
        assert_eq!(json["enabled"], false);
        assert!(!state.core.agents().agents()[1].enabled);
    }

    #[tokio::test]
    async fn test_unknown_agent_returns_404() {
        let app = router().with_state(app_state_replying(&[]));

        let (status, json) = send(app, put_enabled("/ghost/enabled", true)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "agent not found: ghost");
    }
}
