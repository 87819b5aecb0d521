//! Capacities and limits of the reactive core.

use bizflow_agents::application::orchestrator::AgentOrchestrator;
use bizflow_event_bus::EventBus;
use bizflow_propagation::application::engine::PropagationEngine;

/// Settings applied when the core starts.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    /// Retained events.
    pub event_history_capacity: usize,
    /// Retained propagation results.
    pub propagation_log_capacity: usize,
    /// Retained agent response batches.
    pub agent_history_capacity: usize,
    /// Deepest nested publish allowed within one cascade.
    pub max_cascade_depth: usize,
    /// Sampling temperature for agent completion requests.
    pub agent_temperature: f32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            event_history_capacity: EventBus::DEFAULT_HISTORY_CAPACITY,
            propagation_log_capacity: PropagationEngine::DEFAULT_LOG_CAPACITY,
            agent_history_capacity: AgentOrchestrator::DEFAULT_HISTORY_CAPACITY,
            max_cascade_depth: EventBus::DEFAULT_MAX_CASCADE_DEPTH,
            agent_temperature: AgentOrchestrator::DEFAULT_TEMPERATURE,
        }
    }
}
