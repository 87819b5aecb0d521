//! Test mutation sinks: mock `MutationSink` implementations for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bizflow_core::error::DomainError;
use bizflow_core::mutation::{EntityChange, MutationSink};

/// A mutation sink that records every change it is asked to apply and
/// always succeeds.
#[derive(Debug, Default)]
pub struct RecordingMutationSink {
    applied: Mutex<Vec<EntityChange>>,
}

impl RecordingMutationSink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all changes that were applied.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn applied(&self) -> Vec<EntityChange> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait]
impl MutationSink for RecordingMutationSink {
    async fn apply(&self, change: &EntityChange) -> Result<(), DomainError> {
        self.applied.lock().unwrap().push(change.clone());
        Ok(())
    }
}

/// A mutation sink that returns an infrastructure error once a number of
/// changes have gone through. Useful for testing failed and partially
/// applied propagation results.
#[derive(Debug)]
pub struct FailingMutationSink {
    succeed_first: usize,
    calls: AtomicUsize,
    applied: RecordingMutationSink,
}

impl FailingMutationSink {
    /// A sink that fails every change.
    #[must_use]
    pub fn new() -> Self {
        Self::after(0)
    }

    /// A sink that applies the first `succeed_first` changes, then fails.
    #[must_use]
    pub fn after(succeed_first: usize) -> Self {
        Self {
            succeed_first,
            calls: AtomicUsize::new(0),
            applied: RecordingMutationSink::new(),
        }
    }

    /// Returns the changes that went through before the sink started failing.
    pub fn applied(&self) -> Vec<EntityChange> {
        self.applied.applied()
    }
}

impl Default for FailingMutationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MutationSink for FailingMutationSink {
    async fn apply(&self, change: &EntityChange) -> Result<(), DomainError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.succeed_first {
            return self.applied.apply(change).await;
        }
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
