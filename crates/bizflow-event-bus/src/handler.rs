//! Event handler abstraction.

use async_trait::async_trait;
use bizflow_core::error::DomainError;
use bizflow_core::event::Event;

use crate::cascade::Cascade;

/// A bus subscriber.
///
/// Errors and panics are caught by the bus per handler and logged; they never
/// reach the publisher and never stop sibling handlers from running.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Handles one event. Derived events are published through `cascade`.
    ///
    /// # Errors
    ///
    /// Returns any `DomainError`; the bus logs it and moves on.
    async fn handle(&self, event: &Event, cascade: &Cascade<'_>) -> Result<(), DomainError>;
}
