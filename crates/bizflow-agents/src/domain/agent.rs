//! Agent definitions.

use std::sync::atomic::{AtomicBool, Ordering};

use bizflow_core::catalogue::EventType;
use serde::Serialize;

/// A configured pairing of trigger event types, a model, and a fixed
/// system prompt.
///
/// Only the enabled flag changes after construction.
#[derive(Debug)]
pub struct AgentDefinition {
    id: String,
    name: String,
    description: String,
    model: String,
    triggers: Vec<EventType>,
    system_prompt: String,
    enabled: AtomicBool,
}

impl AgentDefinition {
    /// Creates an enabled agent.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        model: impl Into<String>,
        triggers: Vec<EventType>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            model: model.into(),
            triggers,
            system_prompt: system_prompt.into(),
            enabled: AtomicBool::new(true),
        }
    }

    /// Returns the agent disabled.
    #[must_use]
    pub fn disabled(self) -> Self {
        self.enabled.store(false, Ordering::Relaxed);
        self
    }

    /// Agent identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model identifier passed to the completion service.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Event types the agent reacts to.
    #[must_use]
    pub fn triggers(&self) -> &[EventType] {
        &self.triggers
    }

    /// The fixed system prompt.
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Whether the agent currently runs.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enables or disables the agent.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns `true` if the agent is enabled and `event_type` is one of
    /// its triggers.
    #[must_use]
    pub fn matches(&self, event_type: EventType) -> bool {
        self.is_enabled() && self.triggers.contains(&event_type)
    }

    /// Read-only view of the agent.
    #[must_use]
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            model: self.model.clone(),
            triggers: self.triggers.clone(),
            enabled: self.is_enabled(),
        }
    }
}

/// Serializable view of an agent. The system prompt is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentSummary {
    /// Agent identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the agent looks at.
    pub description: String,
    /// Model identifier.
    pub model: String,
    /// Trigger event types.
    pub triggers: Vec<EventType>,
    /// Whether the agent currently runs.
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> AgentDefinition {
        AgentDefinition::new(
            "finance",
            "Finance",
            "Watches cash flow",
            "gpt-4o-mini",
            vec![EventType::InvoicePaid, EventType::InvoiceOverdue],
            "You are a finance analyst.",
        )
    }

    #[test]
    fn test_matches_only_enabled_triggers() {
        let agent = agent();

        assert!(agent.matches(EventType::InvoicePaid));
        assert!(!agent.matches(EventType::QuoteApproved));

        agent.set_enabled(false);
        assert!(!agent.matches(EventType::InvoicePaid));
    }

    #[test]
    fn test_summary_reflects_enabled_flag() {
        let agent = agent().disabled();

        let summary = agent.summary();

        assert_eq!(summary.id, "finance");
        assert_eq!(summary.triggers.len(), 2);
        assert!(!summary.enabled);
    }
}
