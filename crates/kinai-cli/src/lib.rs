//! CLI library components for the KINAI workflow.

pub mod logging;
pub mod mapping;
