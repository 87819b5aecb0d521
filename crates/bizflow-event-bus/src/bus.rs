//! The event bus.

use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use bizflow_core::catalogue::{EventPayload, EventType};
use bizflow_core::clock::Clock;
use bizflow_core::error::DomainError;
use bizflow_core::event::{Event, PublishOptions};
use bizflow_core::history::BoundedHistory;
use bizflow_core::panic::panic_message;
use bizflow_core::sync::lock;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::cascade::{Cascade, CascadeFrame};
use crate::handler::EventHandler;
use crate::subscription::{EventFilter, Subscription, SubscriptionHandle, SubscriptionList};

tokio::task_local! {
    /// Frame for publishes made while a handler runs.
    static HANDLER_FRAME: CascadeFrame;
}

/// Process-wide typed publish/subscribe hub.
///
/// Owns the subscription list (sorted by descending priority, registration
/// order preserved on ties) and a bounded, newest-first event history.
pub struct EventBus {
    clock: Arc<dyn Clock>,
    subscriptions: Arc<SubscriptionList>,
    history: Mutex<BoundedHistory<Arc<Event>>>,
    max_cascade_depth: usize,
}

impl EventBus {
    /// Default number of retained events.
    pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

    /// Default maximum nesting of derived publishes below a root publish.
    pub const DEFAULT_MAX_CASCADE_DEPTH: usize = 16;

    /// Creates a bus with default history capacity and cascade depth.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(
            clock,
            Self::DEFAULT_HISTORY_CAPACITY,
            Self::DEFAULT_MAX_CASCADE_DEPTH,
        )
    }

    /// Creates a bus with explicit limits.
    #[must_use]
    pub fn with_limits(
        clock: Arc<dyn Clock>,
        history_capacity: usize,
        max_cascade_depth: usize,
    ) -> Self {
        Self {
            clock,
            subscriptions: Arc::new(Mutex::new(Vec::new())),
            history: Mutex::new(BoundedHistory::new(history_capacity)),
            max_cascade_depth,
        }
    }

    /// Registers `handler` for events matching `filter`.
    ///
    /// Higher priorities run first; equal priorities run in registration
    /// order. The returned handle removes exactly this registration.
    pub fn subscribe(
        &self,
        filter: impl Into<EventFilter>,
        handler: Arc<dyn EventHandler>,
        priority: i32,
    ) -> SubscriptionHandle {
        let subscription = Arc::new(Subscription {
            id: Uuid::new_v4(),
            filter: filter.into(),
            priority,
            handler,
        });
        let id = subscription.id;

        info!(
            subscription_id = %id,
            handler = subscription.handler.name(),
            filter = %subscription.filter,
            priority,
            "subscribed"
        );

        let mut subscriptions = lock(&self.subscriptions);
        subscriptions.push(subscription);
        // `sort_by` is stable, so ties keep registration order.
        subscriptions.sort_by(|a, b| b.priority.cmp(&a.priority));

        SubscriptionHandle::new(id, Arc::downgrade(&self.subscriptions))
    }

    /// Publishes an event and waits until every matching handler, and
    /// everything those handlers publish in turn, has finished.
    ///
    /// Called from outside any handler, this starts a new cascade. Called
    /// while a handler runs, the event joins that handler's cascade exactly
    /// as if it went through [`Cascade::publish`].
    ///
    /// # Errors
    ///
    /// Handler failures are never returned, so a publish that starts a new
    /// cascade always succeeds. A publish joining a cascade fails with
    /// `DomainError::CascadeDepthExceeded` once the bus's maximum depth is
    /// reached.
    pub fn publish(
        &self,
        payload: EventPayload,
        options: PublishOptions,
    ) -> BoxFuture<'_, Result<Arc<Event>, DomainError>> {
        let frame = HANDLER_FRAME
            .try_with(|frame| *frame)
            .unwrap_or(CascadeFrame::ROOT);
        self.dispatch(payload, options, frame)
    }

    /// Builds, records, and fans out one event at the given cascade frame.
    ///
    /// Boxed because handlers re-enter it through [`Cascade::publish`] and
    /// [`EventBus::publish`].
    pub(crate) fn dispatch(
        &self,
        payload: EventPayload,
        options: PublishOptions,
        frame: CascadeFrame,
    ) -> BoxFuture<'_, Result<Arc<Event>, DomainError>> {
        Box::pin(async move {
            let event_type = payload.event_type();
            if frame.depth > self.max_cascade_depth {
                error!(
                    event_type = %event_type,
                    depth = frame.depth,
                    max_depth = self.max_cascade_depth,
                    correlation_id = ?frame.correlation_id,
                    "cascade depth exceeded; derived event dropped"
                );
                return Err(DomainError::CascadeDepthExceeded {
                    event_type,
                    depth: frame.depth,
                    max_depth: self.max_cascade_depth,
                });
            }

            let event = Arc::new(self.build_event(payload, options, frame));
            lock(&self.history).record(Arc::clone(&event));

            let matched = self.matching_subscriptions(event_type);
            debug!(
                event_id = %event.id,
                event_type = %event_type,
                depth = event.cascade_depth,
                handlers = matched.len(),
                "dispatching event"
            );

            let cascade = Cascade::for_event(self, &event);
            let child_frame = CascadeFrame::child_of(&event);
            for subscription in &matched {
                HANDLER_FRAME
                    .scope(child_frame, Self::invoke(subscription, &event, &cascade))
                    .await;
            }

            Ok(event)
        })
    }

    fn build_event(
        &self,
        payload: EventPayload,
        options: PublishOptions,
        frame: CascadeFrame,
    ) -> Event {
        let id = Uuid::now_v7();
        let source = options.source_or_default().to_owned();
        Event {
            id,
            timestamp: self.clock.now(),
            source,
            user_id: options.user_id,
            tenant_id: options.tenant_id,
            payload,
            metadata: options.metadata,
            correlation_id: frame.correlation_id.unwrap_or(id),
            causation_id: frame.causation_id,
            cascade_depth: frame.depth,
        }
    }

    /// Snapshot of the subscriptions matching `event_type`, in dispatch
    /// order. Registrations made or removed during dispatch do not affect an
    /// in-flight snapshot.
    fn matching_subscriptions(&self, event_type: EventType) -> Vec<Arc<Subscription>> {
        lock(&self.subscriptions)
            .iter()
            .filter(|s| s.filter.matches(event_type))
            .cloned()
            .collect()
    }

    async fn invoke(subscription: &Subscription, event: &Event, cascade: &Cascade<'_>) {
        let outcome = AssertUnwindSafe(subscription.handler.handle(event, cascade))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!(
                    subscription_id = %subscription.id,
                    handler = subscription.handler.name(),
                    event_id = %event.id,
                    event_type = %event.event_type(),
                    error = %err,
                    "event handler failed"
                );
            }
            Err(panic) => {
                error!(
                    subscription_id = %subscription.id,
                    handler = subscription.handler.name(),
                    event_id = %event.id,
                    event_type = %event.event_type(),
                    panic = %panic_message(panic.as_ref()),
                    "event handler panicked"
                );
            }
        }
    }

    /// Up to `limit` recent events, newest first.
    #[must_use]
    pub fn recent_events(&self, limit: usize) -> Vec<Arc<Event>> {
        lock(&self.history).recent(limit)
    }

    /// Up to `limit` recent events of one type, newest first.
    #[must_use]
    pub fn events_by_type(&self, event_type: EventType, limit: usize) -> Vec<Arc<Event>> {
        lock(&self.history)
            .iter()
            .filter(|event| event.event_type() == event_type)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        lock(&self.subscriptions).len()
    }

    /// The configured maximum cascade depth.
    #[must_use]
    pub fn max_cascade_depth(&self) -> usize {
        self.max_cascade_depth
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscription_count())
            .field("max_cascade_depth", &self.max_cascade_depth)
            .finish_non_exhaustive()
    }
}
