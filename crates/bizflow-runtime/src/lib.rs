//! Bizflow Runtime: the explicitly owned reactive core.
//!
//! [`ReactiveCore`] is created once at process start. It owns the event bus
//! and attaches the propagation engine and the agent orchestrator to it;
//! hosts reach every history through it rather than through globals.

pub mod config;
pub mod context;

pub use config::CoreConfig;
pub use context::ReactiveCore;
