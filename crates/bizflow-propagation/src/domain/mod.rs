//! Rule and result types.

pub mod results;
pub mod rules;
