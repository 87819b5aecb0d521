//! Test handlers: `EventHandler` implementations for observing dispatch.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bizflow_core::catalogue::EventType;
use bizflow_core::error::DomainError;
use bizflow_core::event::Event;
use bizflow_event_bus::{Cascade, EventHandler};

/// Ordered log shared between handlers and test code, one
/// `"<handler>:<event type>"` line per invocation.
pub type Journal = Arc<Mutex<Vec<String>>>;

/// A handler that records every event it receives and, optionally, appends a
/// line to a shared [`Journal`].
#[derive(Debug)]
pub struct RecordingHandler {
    name: String,
    seen: Mutex<Vec<Event>>,
    journal: Option<Journal>,
}

impl RecordingHandler {
    /// Create a recording handler with no journal.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seen: Mutex::new(Vec::new()),
            journal: None,
        }
    }

    /// Create a recording handler that also writes to `journal`.
    #[must_use]
    pub fn with_journal(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            journal: Some(Arc::clone(journal)),
            ..Self::new(name)
        }
    }

    /// Returns a snapshot of the events received, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<Event> {
        self.seen.lock().unwrap().clone()
    }

    /// Returns the types of the events received, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn event_types(&self) -> Vec<EventType> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(Event::event_type)
            .collect()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &Event, _cascade: &Cascade<'_>) -> Result<(), DomainError> {
        self.seen.lock().unwrap().push(event.clone());
        if let Some(journal) = &self.journal {
            journal
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event.event_type()));
        }
        Ok(())
    }
}

/// A handler that fails on every event.
#[derive(Debug)]
pub struct FailingHandler;

#[async_trait]
impl EventHandler for FailingHandler {
    fn name(&self) -> &str {
        "failing-handler"
    }

    async fn handle(&self, _event: &Event, _cascade: &Cascade<'_>) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("handler failure".into()))
    }
}
