//! Bizflow Core: shared abstractions for the reactive event core.
//!
//! This crate defines the event catalogue, the error type, and the traits
//! for the external collaborators (completion service, mutation sink) that
//! the bus, the propagation engine, and the agent orchestrator depend on.
//! It contains no infrastructure code.

pub mod catalogue;
pub mod clock;
pub mod completion;
pub mod error;
pub mod event;
pub mod history;
pub mod mutation;
pub mod panic;
pub mod payload;
pub mod sync;

pub use catalogue::{EventPayload, EventType};
pub use error::DomainError;
pub use event::{BusinessModule, Event, PublishOptions};
