//! Consensus orchestration across agents.

pub mod merge;
pub mod orchestrator;

pub use merge::*;
pub use orchestrator::*;
