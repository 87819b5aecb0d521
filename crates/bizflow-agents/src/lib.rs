//! Bizflow: Agent Orchestrator.
//!
//! Fans every event out to the enabled agents whose triggers include its
//! type. Each agent asks the completion service for an analysis of the
//! event; the structured (or raw-text) answers for one event are grouped
//! into a response batch kept in a bounded history.

pub mod application;
pub mod domain;
pub mod infrastructure;
