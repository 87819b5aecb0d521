//! Data-mutation collaborator abstraction.
//!
//! Propagation rules whose effect is a record update rather than a new event
//! hand an [`EntityChange`] to a [`MutationSink`]. Persisting the change is
//! the sink's concern; the reactive core keeps nothing durable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::event::BusinessModule;

/// What happened to an affected entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityAction {
    /// The entity was created.
    Created,
    /// The entity was updated.
    Updated,
    /// An alert was raised about the entity.
    Alerted,
    /// Stakeholders were notified about the entity.
    Notified,
}

/// A derived change to a business entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityChange {
    /// Module owning the entity.
    pub module: BusinessModule,
    /// Entity kind, e.g. `client`.
    pub entity_type: String,
    /// Entity identifier.
    pub entity_id: Uuid,
    /// What is being done to the entity.
    pub action: EntityAction,
    /// Change-specific details.
    pub details: serde_json::Value,
}

/// Applies derived entity changes.
#[async_trait]
pub trait MutationSink: Send + Sync {
    /// Applies `change`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the change cannot be applied.
    async fn apply(&self, change: &EntityChange) -> Result<(), DomainError>;
}
