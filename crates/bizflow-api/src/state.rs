//! Shared application state.

use std::sync::Arc;

use bizflow_runtime::ReactiveCore;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The running reactive core.
    pub core: Arc<ReactiveCore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(core: Arc<ReactiveCore>) -> Self {
        Self { core }
    }
}
