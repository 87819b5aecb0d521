//! The orchestrator, prompt/reply handling, and agent configuration.

pub mod config;
pub mod default_agents;
pub mod orchestrator;
pub mod reply;
