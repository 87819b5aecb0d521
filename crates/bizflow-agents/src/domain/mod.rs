//! Agent definitions and the responses they produce.

pub mod agent;
pub mod response;
