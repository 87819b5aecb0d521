//! Routes for the event bus: publishing and event introspection.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use bizflow_core::catalogue::{EventPayload, EventType};
use bizflow_core::error::DomainError;
use bizflow_core::event::{Event, PublishOptions};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use super::DEFAULT_LIMIT;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct PublishEventRequest {
    /// Tagged payload, `{"type": "...", "data": {...}}`.
    pub payload: serde_json::Value,
    /// Origin tag; defaults to `system`.
    pub source: Option<String>,
    /// User the event is attributed to.
    pub user_id: Option<Uuid>,
    /// Tenant the event is attributed to.
    pub tenant_id: Option<Uuid>,
    /// Free-form side-channel data.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Response body returned once the event's cascade has finished.
#[derive(Debug, Serialize)]
pub struct PublishEventResponse {
    /// Id of the published root event.
    pub event_id: Uuid,
    /// Its type.
    pub event_type: EventType,
}

/// Query parameters for GET /.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Maximum number of events, newest first.
    pub limit: Option<usize>,
    /// Only events of this namespaced type.
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

/// Response body for GET /subscriptions.
#[derive(Debug, Serialize)]
pub struct SubscriptionCountResponse {
    /// Live subscriptions on the bus.
    pub count: usize,
}

/// POST /
#[instrument(skip(state, request), fields(source = request.source.as_deref().unwrap_or("system")))]
async fn publish_event(
    State(state): State<AppState>,
    Json(request): Json<PublishEventRequest>,
) -> Result<Json<PublishEventResponse>, ApiError> {
    let payload: EventPayload = serde_json::from_value(request.payload)
        .map_err(|e| DomainError::Validation(format!("invalid event payload: {e}")))?;
    let options = PublishOptions {
        source: request.source,
        user_id: request.user_id,
        tenant_id: request.tenant_id,
        metadata: request.metadata,
    };

    let event = state.core.publish(payload, options).await?;

    info!(event_id = %event.id, event_type = %event.event_type(), "event published");

    Ok(Json(PublishEventResponse {
        event_id: event.id,
        event_type: event.event_type(),
    }))
}

/// GET /
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let bus = state.core.bus();
    let events = match query.event_type {
        Some(name) => bus.events_by_type(name.parse()?, limit),
        None => bus.recent_events(limit),
    };

    Ok(Json(events.iter().map(|event| event.as_ref().clone()).collect()))
}

/// GET /subscriptions
async fn subscription_count(State(state): State<AppState>) -> Json<SubscriptionCountResponse> {
    Json(SubscriptionCountResponse {
        count: state.core.bus().subscription_count(),
    })
}

/// Returns the router for the event bus.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(publish_event))
        .route("/subscriptions", get(subscription_count))
}
