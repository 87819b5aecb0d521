//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bizflow_agents::domain::agent::AgentDefinition;
use bizflow_core::catalogue::EventType;
use bizflow_core::mutation::MutationSink;
use bizflow_runtime::{CoreConfig, ReactiveCore};
use bizflow_test_support::{FixedClock, RecordingMutationSink, ScriptedCompletionService};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bizflow_api::app;
use bizflow_api::state::AppState;

/// Build the full app router over a core whose completion service answers
/// from `replies`. Uses the same route structure as `main.rs`.
pub fn build_test_app(replies: &[&str], agents: Vec<AgentDefinition>) -> Router {
    let mutations: Arc<dyn MutationSink> = Arc::new(RecordingMutationSink::new());
    let core = ReactiveCore::start_with_agents(
        &CoreConfig::default(),
        Arc::new(FixedClock::default()),
        Arc::new(ScriptedCompletionService::replying(replies.iter().copied())),
        &mutations,
        agents,
    );
    app(AppState::new(Arc::new(core)))
}

/// An agent reacting to `triggers` with a fixed prompt.
pub fn agent(id: &str, triggers: Vec<EventType>) -> AgentDefinition {
    AgentDefinition::new(id, id, "", "test-model", triggers, "prompt")
}

/// Send a request with an optional JSON body and return the response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send_json(app, "GET", uri, None).await
}
