//! Multi-agent trading signal consensus.
//!
//! Specialized agents (technical, discovery, macro) analyze a shared
//! market snapshot; the consensus orchestrator reconciles their output
//! into ranked buy/sell recommendations.

pub mod agents;
pub mod common;
pub mod config;
pub mod consensus;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

pub use agents::{Agent, AgentError};
pub use config::{Config, ConfigError};
pub use consensus::{ConsensusError, ConsensusOrchestrator, OrchestratorState};
pub use models::{ConsensusResult, MarketSnapshot, TradeOutcome};
