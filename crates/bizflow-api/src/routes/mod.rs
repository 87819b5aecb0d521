//! Route modules, one per reactive core component.

pub mod agents;
pub mod events;
pub mod health;
pub mod propagation;

use serde::Deserialize;

/// Entries returned by list endpoints when no limit is given.
pub const DEFAULT_LIMIT: usize = 50;

/// `?limit=` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    /// Maximum number of entries, newest first.
    pub limit: Option<usize>,
}

impl LimitQuery {
    /// The requested limit, or [`DEFAULT_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// Request body for the enable/disable endpoints.
#[derive(Debug, Deserialize)]
pub struct SetEnabledRequest {
    /// New value of the enabled flag.
    pub enabled: bool,
}
