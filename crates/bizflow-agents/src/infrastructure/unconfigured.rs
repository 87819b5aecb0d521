//! Placeholder completion service for hosts without model credentials.

use async_trait::async_trait;
use bizflow_core::completion::{CompletionRequest, CompletionService};
use bizflow_core::error::DomainError;

/// Fails every request. Agents still run and log their failures, but no
/// response batches are recorded.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredCompletionService;

#[async_trait]
impl CompletionService for UnconfiguredCompletionService {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, DomainError> {
        Err(DomainError::Completion(
            "no completion service configured".into(),
        ))
    }
}
