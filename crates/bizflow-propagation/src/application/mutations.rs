//! Default mutation sink.

use async_trait::async_trait;
use bizflow_core::error::DomainError;
use bizflow_core::mutation::{EntityChange, MutationSink};
use tracing::info;

/// A sink that only logs each change. Used when no persistence layer is
/// wired into the reactive core.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMutationSink;

#[async_trait]
impl MutationSink for LoggingMutationSink {
    async fn apply(&self, change: &EntityChange) -> Result<(), DomainError> {
        info!(
            module = %change.module,
            entity_type = %change.entity_type,
            entity_id = %change.entity_id,
            action = ?change.action,
            details = %change.details,
            "entity change recorded"
        );
        Ok(())
    }
}
