//! The dispatch frame handed to every handler invocation.

use std::sync::Arc;

use bizflow_core::catalogue::EventPayload;
use bizflow_core::error::DomainError;
use bizflow_core::event::{Event, PublishOptions};
use uuid::Uuid;

use crate::bus::EventBus;
use crate::handler::EventHandler;
use crate::subscription::{EventFilter, SubscriptionHandle};

/// Position of a publish call within a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CascadeFrame {
    pub(crate) depth: usize,
    pub(crate) correlation_id: Option<Uuid>,
    pub(crate) causation_id: Option<Uuid>,
}

impl CascadeFrame {
    pub(crate) const ROOT: Self = Self {
        depth: 0,
        correlation_id: None,
        causation_id: None,
    };

    /// Frame for events published while `event` is being handled.
    pub(crate) fn child_of(event: &Event) -> Self {
        Self {
            depth: event.cascade_depth + 1,
            correlation_id: Some(event.correlation_id),
            causation_id: Some(event.id),
        }
    }
}

/// A handler's view of the cascade it is running in.
///
/// Publishing through the cascade records the triggering event as the cause,
/// carries the correlation id forward, and increments the depth checked
/// against the bus's maximum.
#[derive(Debug, Clone, Copy)]
pub struct Cascade<'a> {
    bus: &'a EventBus,
    frame: CascadeFrame,
}

impl<'a> Cascade<'a> {
    pub(crate) fn for_event(bus: &'a EventBus, event: &Event) -> Self {
        Self {
            bus,
            frame: CascadeFrame::child_of(event),
        }
    }

    /// Publishes a derived event and waits for its whole fan-out, including
    /// any further nested publishes, to finish.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CascadeDepthExceeded` if the derived event would
    /// be nested deeper than the bus allows. The event is then neither
    /// recorded nor dispatched.
    pub async fn publish(
        &self,
        payload: EventPayload,
        options: PublishOptions,
    ) -> Result<Arc<Event>, DomainError> {
        self.bus.dispatch(payload, options, self.frame).await
    }

    /// Registers a handler on the dispatching bus. It sees events published
    /// after the current one, never the event in flight.
    pub fn subscribe(
        &self,
        filter: impl Into<EventFilter>,
        handler: Arc<dyn EventHandler>,
        priority: i32,
    ) -> SubscriptionHandle {
        self.bus.subscribe(filter, handler, priority)
    }
}
