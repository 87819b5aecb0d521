//! Test completion services: scripted `CompletionService` implementations.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bizflow_core::completion::{CompletionRequest, CompletionService};
use bizflow_core::error::DomainError;

/// A completion service that answers from a predetermined script, one entry
/// per call in order, and records every request it receives.
///
/// `Err` entries are returned as `DomainError::Completion`. Once the script
/// is exhausted every further call fails.
#[derive(Debug)]
pub struct ScriptedCompletionService {
    script: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletionService {
    /// Create a service that replays `script`.
    #[must_use]
    pub fn new(script: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a service that answers every call in `replies` successfully.
    #[must_use]
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Returns a snapshot of all requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(DomainError::Completion(message)),
            None => Err(DomainError::Completion("completion script exhausted".into())),
        }
    }
}

/// A completion service that always fails. Useful for testing agent
/// failure isolation.
#[derive(Debug)]
pub struct FailingCompletionService;

#[async_trait]
impl CompletionService for FailingCompletionService {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, DomainError> {
        Err(DomainError::Completion("service unavailable".into()))
    }
}
