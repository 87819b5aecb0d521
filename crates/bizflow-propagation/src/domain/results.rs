//! Propagation results.

use bizflow_core::catalogue::EventType;
use bizflow_core::event::{BusinessModule, Event};
use bizflow_core::mutation::{EntityAction, EntityChange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rules::PropagationRule;

/// An entity touched by a rule action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedEntity {
    /// Module owning the entity.
    pub module: BusinessModule,
    /// Entity kind, e.g. `invoice`.
    pub entity_type: String,
    /// Entity identifier.
    pub entity_id: Uuid,
    /// What happened to it.
    pub action: EntityAction,
}

impl AffectedEntity {
    /// Creates an affected-entity descriptor.
    #[must_use]
    pub fn new(
        module: BusinessModule,
        entity_type: impl Into<String>,
        entity_id: Uuid,
        action: EntityAction,
    ) -> Self {
        Self {
            module,
            entity_type: entity_type.into(),
            entity_id,
            action,
        }
    }
}

impl From<&EntityChange> for AffectedEntity {
    fn from(change: &EntityChange) -> Self {
        Self::new(
            change.module,
            change.entity_type.clone(),
            change.entity_id,
            change.action,
        )
    }
}

/// Outcome of one rule invocation for one event.
#[derive(Debug, Clone, Serialize)]
pub struct PropagationResult {
    /// The rule that ran.
    pub rule_id: String,
    /// Human-readable rule name.
    pub rule_name: String,
    /// The triggering event.
    pub event_id: Uuid,
    /// The triggering event type.
    pub event_type: EventType,
    /// Whether the action completed without error.
    pub success: bool,
    /// Entities the action touched.
    pub affected_entities: Vec<AffectedEntity>,
    /// Error messages; empty on success.
    pub errors: Vec<String>,
    /// When the action finished.
    pub completed_at: DateTime<Utc>,
}

impl PropagationResult {
    /// A successful result.
    #[must_use]
    pub fn succeeded(
        rule: &PropagationRule,
        event: &Event,
        affected_entities: Vec<AffectedEntity>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            rule_id: rule.id().to_owned(),
            rule_name: rule.name().to_owned(),
            event_id: event.id,
            event_type: event.event_type(),
            success: true,
            affected_entities,
            errors: Vec::new(),
            completed_at,
        }
    }

    /// A failed result carrying `errors` and whatever the action changed
    /// before it failed.
    #[must_use]
    pub fn failed(
        rule: &PropagationRule,
        event: &Event,
        affected_entities: Vec<AffectedEntity>,
        errors: Vec<String>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            rule_id: rule.id().to_owned(),
            rule_name: rule.name().to_owned(),
            event_id: event.id,
            event_type: event.event_type(),
            success: false,
            affected_entities,
            errors,
            completed_at,
        }
    }
}
