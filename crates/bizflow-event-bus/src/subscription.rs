//! Subscriptions and unsubscribe handles.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use bizflow_core::catalogue::EventType;
use bizflow_core::sync::lock;
use uuid::Uuid;

use crate::handler::EventHandler;

/// Which event types a subscription receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// The wildcard: every event type.
    Any,
    /// Exactly one event type.
    Exact(EventType),
}

impl EventFilter {
    /// Returns `true` if an event of `event_type` matches.
    #[must_use]
    pub fn matches(self, event_type: EventType) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == event_type,
        }
    }
}

impl From<EventType> for EventFilter {
    fn from(event_type: EventType) -> Self {
        Self::Exact(event_type)
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Exact(event_type) => fmt::Display::fmt(event_type, f),
        }
    }
}

/// A registered (handler, filter, priority) triple.
pub(crate) struct Subscription {
    pub(crate) id: Uuid,
    pub(crate) filter: EventFilter,
    pub(crate) priority: i32,
    pub(crate) handler: Arc<dyn EventHandler>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .field("priority", &self.priority)
            .field("handler", &self.handler.name())
            .finish()
    }
}

pub(crate) type SubscriptionList = Mutex<Vec<Arc<Subscription>>>;

/// Capability to remove exactly one registration.
///
/// Dropping the handle leaves the subscription in place.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: Uuid,
    subscriptions: Weak<SubscriptionList>,
}

impl SubscriptionHandle {
    pub(crate) fn new(id: Uuid, subscriptions: Weak<SubscriptionList>) -> Self {
        Self { id, subscriptions }
    }

    /// The subscription identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Removes the registration this handle was issued for.
    ///
    /// Returns `false` if it was already gone or the bus has been dropped.
    pub fn unsubscribe(&self) -> bool {
        let Some(subscriptions) = self.subscriptions.upgrade() else {
            return false;
        };
        let mut subscriptions = lock(&subscriptions);
        match subscriptions.iter().position(|s| s.id == self.id) {
            Some(index) => {
                subscriptions.remove(index);
                tracing::info!(subscription_id = %self.id, "unsubscribed");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matches_every_type() {
        assert!(
            EventType::ALL
                .iter()
                .all(|event_type| EventFilter::Any.matches(*event_type))
        );
    }

    #[test]
    fn test_exact_filter_matches_only_its_type() {
        let filter = EventFilter::from(EventType::InvoicePaid);

        assert!(filter.matches(EventType::InvoicePaid));
        assert!(!filter.matches(EventType::InvoiceCreated));
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(EventFilter::Any.to_string(), "*");
        assert_eq!(
            EventFilter::Exact(EventType::QuoteApproved).to_string(),
            "sales.quote.approved"
        );
    }

    #[test]
    fn test_unsubscribe_after_bus_dropped_returns_false() {
        let list: Arc<SubscriptionList> = Arc::new(Mutex::new(Vec::new()));
        let handle = SubscriptionHandle::new(Uuid::new_v4(), Arc::downgrade(&list));
        drop(list);

        assert!(!handle.unsubscribe());
    }
}
