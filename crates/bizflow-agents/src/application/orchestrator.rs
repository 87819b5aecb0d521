//! The agent orchestrator.
//!
//! Subscribes to every event below the propagation engine, so an event's
//! derived cascade has fully settled before agents look at it. Matching
//! agents run one at a time in table order; each invocation ends as a
//! structured reply, a raw-text reply, or a logged failure.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bizflow_core::clock::Clock;
use bizflow_core::completion::{ChatMessage, CompletionRequest, CompletionService};
use bizflow_core::error::DomainError;
use bizflow_core::event::Event;
use bizflow_core::history::BoundedHistory;
use bizflow_core::panic::panic_message;
use bizflow_core::sync::lock;
use bizflow_event_bus::{Cascade, EventBus, EventFilter, EventHandler, SubscriptionHandle};
use futures::FutureExt;
use tracing::{error, info, warn};

use super::reply::{describe_event, interpret};
use crate::domain::agent::{AgentDefinition, AgentSummary};
use crate::domain::response::{AgentResponse, ResponseBatch, ResponseMode};

/// Bus priority of the orchestrator. Lower than the propagation engine.
pub const AGENT_PRIORITY: i32 = 50;

/// Terminal state of one agent invocation.
#[derive(Debug)]
pub enum AgentOutcome {
    /// The completion parsed as a structured reply.
    Structured(AgentResponse),
    /// The completion was kept verbatim as the analysis.
    RawText(AgentResponse),
    /// The invocation produced nothing.
    Failed(DomainError),
}

impl AgentOutcome {
    /// The response, unless the invocation failed.
    #[must_use]
    pub fn into_response(self) -> Option<AgentResponse> {
        match self {
            Self::Structured(response) | Self::RawText(response) => Some(response),
            Self::Failed(_) => None,
        }
    }
}

/// Fans events out to agents and keeps their response batches.
pub struct AgentOrchestrator {
    agents: Vec<AgentDefinition>,
    completion: Arc<dyn CompletionService>,
    clock: Arc<dyn Clock>,
    temperature: f32,
    history: Mutex<BoundedHistory<ResponseBatch>>,
}

impl AgentOrchestrator {
    /// Default number of retained response batches.
    pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

    /// Default sampling temperature for agent requests.
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    /// Creates an orchestrator over a fixed agent table.
    #[must_use]
    pub fn new(
        agents: Vec<AgentDefinition>,
        completion: Arc<dyn CompletionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            agents,
            completion,
            clock,
            temperature: Self::DEFAULT_TEMPERATURE,
            history: Mutex::new(BoundedHistory::new(Self::DEFAULT_HISTORY_CAPACITY)),
        }
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the response batch history capacity.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = Mutex::new(BoundedHistory::new(capacity));
        self
    }

    /// Subscribes the orchestrator to every event type on `bus`.
    pub fn attach(self: &Arc<Self>, bus: &EventBus) -> SubscriptionHandle {
        let handler: Arc<dyn EventHandler> = Arc::clone(self) as Arc<dyn EventHandler>;
        bus.subscribe(EventFilter::Any, handler, AGENT_PRIORITY)
    }

    /// Up to `limit` recent response batches, newest first.
    #[must_use]
    pub fn recent_batches(&self, limit: usize) -> Vec<ResponseBatch> {
        lock(&self.history).recent(limit)
    }

    /// Summaries of every agent in table order.
    #[must_use]
    pub fn agents(&self) -> Vec<AgentSummary> {
        self.agents.iter().map(AgentDefinition::summary).collect()
    }

    /// Enables or disables an agent by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no agent has that id.
    pub fn set_agent_enabled(
        &self,
        agent_id: &str,
        enabled: bool,
    ) -> Result<AgentSummary, DomainError> {
        let agent = self
            .agents
            .iter()
            .find(|agent| agent.id() == agent_id)
            .ok_or_else(|| DomainError::NotFound {
                kind: "agent",
                id: agent_id.to_owned(),
            })?;
        agent.set_enabled(enabled);
        info!(agent_id, enabled, "agent toggled");
        Ok(agent.summary())
    }

    /// Runs one agent against one event.
    pub async fn invoke(&self, agent: &AgentDefinition, event: &Event) -> AgentOutcome {
        let description = match describe_event(event) {
            Ok(description) => description,
            Err(err) => return AgentOutcome::Failed(err),
        };
        let request = CompletionRequest {
            model: agent.model().to_owned(),
            messages: vec![
                ChatMessage::system(agent.system_prompt()),
                ChatMessage::user(description),
            ],
            temperature: self.temperature,
        };

        let completion = AssertUnwindSafe(self.completion.complete(&request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(DomainError::Panicked(panic_message(panic.as_ref()))));

        match completion {
            Ok(text) => {
                let response = interpret(agent.id(), &text);
                match response.mode {
                    ResponseMode::Structured => AgentOutcome::Structured(response),
                    ResponseMode::RawText => AgentOutcome::RawText(response),
                }
            }
            Err(err) => AgentOutcome::Failed(err),
        }
    }
}

#[async_trait]
impl EventHandler for AgentOrchestrator {
    fn name(&self) -> &str {
        "agent-orchestrator"
    }

    async fn handle(&self, event: &Event, _cascade: &Cascade<'_>) -> Result<(), DomainError> {
        let event_type = event.event_type();
        let matching: Vec<&AgentDefinition> = self
            .agents
            .iter()
            .filter(|agent| agent.matches(event_type))
            .collect();
        if matching.is_empty() {
            return Ok(());
        }

        let mut responses = Vec::with_capacity(matching.len());
        for agent in matching {
            match self.invoke(agent, event).await {
                AgentOutcome::Structured(response) => {
                    info!(
                        agent_id = agent.id(),
                        event_id = %event.id,
                        event_type = %event_type,
                        actions = response.suggested_actions.len(),
                        "agent produced structured response"
                    );
                    responses.push(response);
                }
                AgentOutcome::RawText(response) => {
                    warn!(
                        agent_id = agent.id(),
                        event_id = %event.id,
                        event_type = %event_type,
                        "agent reply was not structured, keeping raw text"
                    );
                    responses.push(response);
                }
                AgentOutcome::Failed(err) => {
                    error!(
                        agent_id = agent.id(),
                        event_id = %event.id,
                        event_type = %event_type,
                        error = %err,
                        "agent invocation failed"
                    );
                }
            }
        }

        if responses.is_empty() {
            return Ok(());
        }
        lock(&self.history).record(ResponseBatch {
            event_id: event.id,
            event_type,
            responses,
            timestamp: self.clock.now(),
        });
        Ok(())
    }
}

impl fmt::Debug for AgentOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentOrchestrator")
            .field("agents", &self.agents)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}
