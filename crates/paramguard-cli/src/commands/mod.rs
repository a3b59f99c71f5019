//! CLI command implementations.

pub mod audit;
pub mod check;
pub mod drift;
pub mod rules;
