//! Completion service implementations.

pub mod openai;
pub mod unconfigured;
