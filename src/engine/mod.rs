//! Session engine.
//!
//! Provides plan construction, check orchestration and result aggregation.

pub mod orchestrator;
pub mod plan;
pub mod result;
