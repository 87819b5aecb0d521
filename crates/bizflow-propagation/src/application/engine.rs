//! The propagation engine.
//!
//! Subscribes to every event at high priority, runs the enabled rules whose
//! trigger matches one at a time in table order, and records one result per
//! rule invocation in a bounded log.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bizflow_core::clock::Clock;
use bizflow_core::error::DomainError;
use bizflow_core::event::Event;
use bizflow_core::history::BoundedHistory;
use bizflow_core::panic::panic_message;
use bizflow_core::sync::lock;
use bizflow_event_bus::{Cascade, EventBus, EventFilter, EventHandler, SubscriptionHandle};
use futures::FutureExt;
use tracing::{error, info};

use crate::domain::results::PropagationResult;
use crate::domain::rules::{PropagationRule, RuleSummary};

/// Bus priority of the propagation engine. Higher than the agent
/// orchestrator, so propagation effects settle before agents analyse the
/// same event.
pub const PROPAGATION_PRIORITY: i32 = 100;

/// Runs propagation rules against the event stream.
pub struct PropagationEngine {
    rules: Vec<PropagationRule>,
    clock: Arc<dyn Clock>,
    log: Mutex<BoundedHistory<PropagationResult>>,
}

impl PropagationEngine {
    /// Default number of retained results.
    pub const DEFAULT_LOG_CAPACITY: usize = 100;

    /// Creates an engine over a fixed rule table.
    #[must_use]
    pub fn new(rules: Vec<PropagationRule>, clock: Arc<dyn Clock>) -> Self {
        Self::with_log_capacity(rules, clock, Self::DEFAULT_LOG_CAPACITY)
    }

    /// Creates an engine with an explicit result log capacity.
    #[must_use]
    pub fn with_log_capacity(
        rules: Vec<PropagationRule>,
        clock: Arc<dyn Clock>,
        log_capacity: usize,
    ) -> Self {
        Self {
            rules,
            clock,
            log: Mutex::new(BoundedHistory::new(log_capacity)),
        }
    }

    /// Subscribes the engine to every event type on `bus`.
    pub fn attach(self: &Arc<Self>, bus: &EventBus) -> SubscriptionHandle {
        let handler: Arc<dyn EventHandler> = Arc::clone(self) as Arc<dyn EventHandler>;
        bus.subscribe(EventFilter::Any, handler, PROPAGATION_PRIORITY)
    }

    /// Up to `limit` recent results, newest first.
    #[must_use]
    pub fn recent_results(&self, limit: usize) -> Vec<PropagationResult> {
        lock(&self.log).recent(limit)
    }

    /// Summaries of every rule in table order.
    #[must_use]
    pub fn rules(&self) -> Vec<RuleSummary> {
        self.rules.iter().map(PropagationRule::summary).collect()
    }

    /// Enables or disables a rule by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no rule has that id.
    pub fn set_rule_enabled(
        &self,
        rule_id: &str,
        enabled: bool,
    ) -> Result<RuleSummary, DomainError> {
        let rule = self
            .rules
            .iter()
            .find(|rule| rule.id() == rule_id)
            .ok_or_else(|| DomainError::NotFound {
                kind: "rule",
                id: rule_id.to_owned(),
            })?;
        rule.set_enabled(enabled);
        info!(rule_id, enabled, "propagation rule toggled");
        Ok(rule.summary())
    }

    async fn run_rule(
        &self,
        rule: &PropagationRule,
        event: &Event,
        cascade: &Cascade<'_>,
    ) -> PropagationResult {
        let outcome = AssertUnwindSafe(rule.action().execute(event, cascade))
            .catch_unwind()
            .await;
        let completed_at = self.clock.now();

        match outcome {
            Ok(Ok(affected)) => {
                info!(
                    rule_id = rule.id(),
                    event_id = %event.id,
                    event_type = %event.event_type(),
                    affected = affected.len(),
                    "propagation rule succeeded"
                );
                PropagationResult::succeeded(rule, event, affected, completed_at)
            }
            Ok(Err(err)) => {
                error!(
                    rule_id = rule.id(),
                    event_id = %event.id,
                    event_type = %event.event_type(),
                    error = %err,
                    applied = err.applied.len(),
                    "propagation rule failed"
                );
                let errors = vec![err.error.to_string()];
                PropagationResult::failed(rule, event, err.applied, errors, completed_at)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    rule_id = rule.id(),
                    event_id = %event.id,
                    event_type = %event.event_type(),
                    panic = %message,
                    "propagation rule panicked"
                );
                let errors = vec![DomainError::Panicked(message).to_string()];
                PropagationResult::failed(rule, event, Vec::new(), errors, completed_at)
            }
        }
    }
}

#[async_trait]
impl EventHandler for PropagationEngine {
    fn name(&self) -> &str {
        "propagation-engine"
    }

    async fn handle(&self, event: &Event, cascade: &Cascade<'_>) -> Result<(), DomainError> {
        let event_type = event.event_type();
        let matching: Vec<&PropagationRule> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(event_type))
            .collect();

        for rule in matching {
            let result = self.run_rule(rule, event, cascade).await;
            lock(&self.log).record(result);
        }
        Ok(())
    }
}

impl fmt::Debug for PropagationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropagationEngine")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
