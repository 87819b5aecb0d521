//! The immutable event record and publish options.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalogue::{EventPayload, EventType};

/// Source tag used when a publisher does not supply one.
pub const DEFAULT_SOURCE: &str = "system";

/// Business module an event type or affected entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessModule {
    /// Leads, opportunities, quotes.
    Sales,
    /// Invoices, expenses, payments.
    Finance,
    /// Products and stock.
    Inventory,
    /// Projects and tasks.
    Projects,
    /// Client records.
    Clients,
    /// Time tracking.
    Hr,
}

impl BusinessModule {
    /// Returns the lowercase module tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sales => "sales",
            Self::Finance => "finance",
            Self::Inventory => "inventory",
            Self::Projects => "projects",
            Self::Clients => "clients",
            Self::Hr => "hr",
        }
    }
}

impl fmt::Display for BusinessModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record of something that happened.
///
/// Events are only constructed by the bus when publishing; handlers receive
/// them by shared reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Process-unique identifier, generated at publish time.
    pub id: Uuid,
    /// Creation time, assigned by the bus.
    pub timestamp: DateTime<Utc>,
    /// Free-text origin tag.
    pub source: String,
    /// User the event is attributed to.
    pub user_id: Option<Uuid>,
    /// Tenant the event is attributed to.
    pub tenant_id: Option<Uuid>,
    /// Typed payload; determines the event type.
    pub payload: EventPayload,
    /// Free-form side-channel data.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Id of the root event of the cascade this event belongs to.
    pub correlation_id: Uuid,
    /// Id of the event whose handler published this one.
    pub causation_id: Option<Uuid>,
    /// Number of nested publishes between the root event and this one.
    pub cascade_depth: usize,
}

impl Event {
    /// Returns the event type, derived from the payload variant.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        self.payload.event_type()
    }

    /// Returns `true` if this event was published directly by a caller
    /// rather than from within another event's handler.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.causation_id.is_none()
    }
}

/// Optional attribution supplied alongside a publish call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishOptions {
    /// Origin tag; defaults to [`DEFAULT_SOURCE`].
    pub source: Option<String>,
    /// User the event is attributed to.
    pub user_id: Option<Uuid>,
    /// Tenant the event is attributed to.
    pub tenant_id: Option<Uuid>,
    /// Free-form side-channel data.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl PublishOptions {
    /// Options with only the source tag set.
    #[must_use]
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Attributes the event to a user.
    #[must_use]
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Attributes the event to a tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns the effective source tag.
    #[must_use]
    pub fn source_or_default(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_SOURCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_defaults_to_system() {
        let options = PublishOptions::default();
        assert_eq!(options.source_or_default(), "system");
    }

    #[test]
    fn test_builder_sets_attribution_fields() {
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let options = PublishOptions::from_source("quotes-screen")
            .with_user(user_id)
            .with_tenant(tenant_id)
            .with_metadata("ip", serde_json::json!("10.0.0.1"));

        assert_eq!(options.source_or_default(), "quotes-screen");
        assert_eq!(options.user_id, Some(user_id));
        assert_eq!(options.tenant_id, Some(tenant_id));
        assert_eq!(options.metadata["ip"], "10.0.0.1");
    }
}
