//! Bizflow Event Bus: process-wide typed publish/subscribe hub.
//!
//! Handlers are invoked one at a time in descending priority order. A
//! handler may publish derived events through its [`Cascade`]; such nested
//! publishes run to completion, depth first, before the handler resumes.
//! Nesting is bounded by a configurable maximum cascade depth.

pub mod bus;
pub mod cascade;
pub mod handler;
pub mod subscription;

pub use bus::EventBus;
pub use cascade::Cascade;
pub use handler::EventHandler;
pub use subscription::{EventFilter, SubscriptionHandle};
