//! Domain error types.

use thiserror::Error;

use crate::catalogue::EventType;

/// Top-level error type shared by the bus, the engines, and their
/// collaborators.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A rule, agent, or other named entity was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of entity was looked up.
        kind: &'static str,
        /// The identifier that did not match.
        id: String,
    },

    /// Invalid input or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A handler received a payload variant it cannot act on.
    #[error("unexpected payload: expected {expected}, got {actual}")]
    UnexpectedPayload {
        /// The event type the handler was written for.
        expected: EventType,
        /// The event type actually received.
        actual: EventType,
    },

    /// A nested publish would exceed the configured cascade depth.
    #[error("cascade depth exceeded publishing {event_type}: depth {depth} exceeds maximum {max_depth}")]
    CascadeDepthExceeded {
        /// The event type whose publish was refused.
        event_type: EventType,
        /// The depth the refused event would have had.
        depth: usize,
        /// The configured maximum depth.
        max_depth: usize,
    },

    /// The external completion service failed.
    #[error("completion service error: {0}")]
    Completion(String),

    /// A handler panicked while processing an event.
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// An infrastructure or collaborator error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
