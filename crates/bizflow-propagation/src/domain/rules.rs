//! Propagation rules.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bizflow_core::catalogue::EventType;
use bizflow_core::error::DomainError;
use bizflow_core::event::{BusinessModule, Event};
use bizflow_event_bus::Cascade;
use serde::Serialize;

use super::results::AffectedEntity;

/// A failed rule action, with the entities it changed before failing.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct RuleError {
    /// What went wrong.
    #[source]
    pub error: DomainError,
    /// Changes that landed before the failure.
    pub applied: Vec<AffectedEntity>,
}

impl RuleError {
    /// A failure that follows the already applied `applied` changes.
    #[must_use]
    pub fn after(error: DomainError, applied: Vec<AffectedEntity>) -> Self {
        Self { error, applied }
    }
}

impl From<DomainError> for RuleError {
    fn from(error: DomainError) -> Self {
        Self::after(error, Vec::new())
    }
}

/// The business action a rule performs for a matching event.
#[async_trait]
pub trait RuleAction: Send + Sync {
    /// Performs the action. Derived events go through `cascade`.
    ///
    /// # Errors
    ///
    /// Returns a `RuleError` if the payload is not the expected variant, the
    /// mutation collaborator fails, or a derived publish is refused. Changes
    /// applied before the failure travel with it.
    async fn execute(
        &self,
        event: &Event,
        cascade: &Cascade<'_>,
    ) -> Result<Vec<AffectedEntity>, RuleError>;
}

/// A fixed mapping from a trigger event type to a derived action.
///
/// Only the enabled flag changes after construction.
pub struct PropagationRule {
    id: String,
    name: String,
    trigger: EventType,
    target_modules: Vec<BusinessModule>,
    action: Box<dyn RuleAction>,
    enabled: AtomicBool,
}

impl PropagationRule {
    /// Creates an enabled rule.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        trigger: EventType,
        target_modules: Vec<BusinessModule>,
        action: impl RuleAction + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger,
            target_modules,
            action: Box::new(action),
            enabled: AtomicBool::new(true),
        }
    }

    /// Returns the rule disabled.
    #[must_use]
    pub fn disabled(self) -> Self {
        self.enabled.store(false, Ordering::Relaxed);
        self
    }

    /// Rule identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The event type that triggers this rule.
    #[must_use]
    pub fn trigger(&self) -> EventType {
        self.trigger
    }

    /// The rule's action.
    #[must_use]
    pub fn action(&self) -> &dyn RuleAction {
        self.action.as_ref()
    }

    /// Whether the rule currently runs.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enables or disables the rule.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns `true` if the rule is enabled and triggered by `event_type`.
    #[must_use]
    pub fn matches(&self, event_type: EventType) -> bool {
        self.is_enabled() && self.trigger == event_type
    }

    /// Read-only view of the rule.
    #[must_use]
    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            trigger: self.trigger,
            target_modules: self.target_modules.clone(),
            enabled: self.is_enabled(),
        }
    }
}

impl fmt::Debug for PropagationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropagationRule")
            .field("id", &self.id)
            .field("trigger", &self.trigger)
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

/// Serializable view of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSummary {
    /// Rule identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Trigger event type.
    pub trigger: EventType,
    /// Modules the rule's effects land in.
    pub target_modules: Vec<BusinessModule>,
    /// Whether the rule currently runs.
    pub enabled: bool,
}
