//! The reactive core context.

use std::sync::Arc;

use bizflow_agents::application::default_agents::default_agents;
use bizflow_agents::application::orchestrator::AgentOrchestrator;
use bizflow_agents::domain::agent::AgentDefinition;
use bizflow_core::catalogue::EventPayload;
use bizflow_core::clock::Clock;
use bizflow_core::completion::CompletionService;
use bizflow_core::error::DomainError;
use bizflow_core::event::{Event, PublishOptions};
use bizflow_core::mutation::MutationSink;
use bizflow_event_bus::{EventBus, SubscriptionHandle};
use bizflow_propagation::application::default_rules::default_rules;
use bizflow_propagation::application::engine::PropagationEngine;
use tracing::info;

use crate::config::CoreConfig;

/// Bus, propagation engine and agent orchestrator, wired together.
#[derive(Debug)]
pub struct ReactiveCore {
    bus: EventBus,
    propagation: Arc<PropagationEngine>,
    agents: Arc<AgentOrchestrator>,
    subscriptions: [SubscriptionHandle; 2],
}

impl ReactiveCore {
    /// Starts the core with the default rule table and the built-in agents.
    #[must_use]
    pub fn start(
        config: &CoreConfig,
        clock: Arc<dyn Clock>,
        completion: Arc<dyn CompletionService>,
        mutations: &Arc<dyn MutationSink>,
    ) -> Self {
        Self::start_with_agents(config, clock, completion, mutations, default_agents())
    }

    /// Starts the core with the default rule table and the given agents.
    #[must_use]
    pub fn start_with_agents(
        config: &CoreConfig,
        clock: Arc<dyn Clock>,
        completion: Arc<dyn CompletionService>,
        mutations: &Arc<dyn MutationSink>,
        agents: Vec<AgentDefinition>,
    ) -> Self {
        let bus = EventBus::with_limits(
            Arc::clone(&clock),
            config.event_history_capacity,
            config.max_cascade_depth,
        );

        let propagation = Arc::new(PropagationEngine::with_log_capacity(
            default_rules(mutations),
            Arc::clone(&clock),
            config.propagation_log_capacity,
        ));
        let orchestrator = Arc::new(
            AgentOrchestrator::new(agents, completion, clock)
                .with_temperature(config.agent_temperature)
                .with_history_capacity(config.agent_history_capacity),
        );

        let subscriptions = [propagation.attach(&bus), orchestrator.attach(&bus)];
        info!(
            rules = propagation.rules().len(),
            agents = orchestrator.agents().len(),
            max_cascade_depth = config.max_cascade_depth,
            "reactive core started"
        );

        Self {
            bus,
            propagation,
            agents: orchestrator,
            subscriptions,
        }
    }

    /// The event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The propagation engine.
    #[must_use]
    pub fn propagation(&self) -> &PropagationEngine {
        &self.propagation
    }

    /// The agent orchestrator.
    #[must_use]
    pub fn agents(&self) -> &AgentOrchestrator {
        &self.agents
    }

    /// Publishes an event and waits for its whole cascade.
    ///
    /// # Errors
    ///
    /// Never fails outside a handler; from inside one the event joins the
    /// running cascade and is depth-checked. See [`EventBus::publish`].
    pub async fn publish(
        &self,
        payload: EventPayload,
        options: PublishOptions,
    ) -> Result<Arc<Event>, DomainError> {
        self.bus.publish(payload, options).await
    }

    /// Detaches the engine and the orchestrator from the bus. Histories stay
    /// readable; later publishes are only recorded.
    pub fn shutdown(&self) {
        let detached = self
            .subscriptions
            .iter()
            .filter(|handle| handle.unsubscribe())
            .count();
        info!(detached, "reactive core shut down");
    }
}
