//! The engine, its default rule table, and the default mutation sink.

pub mod default_rules;
pub mod engine;
pub mod mutations;
