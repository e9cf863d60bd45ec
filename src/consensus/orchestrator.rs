//! Runs every initialized agent concurrently and reconciles their output
//! into a ranked, filtered `ConsensusResult`.

use crate::agents::{build_agents, Agent, AgentStatusHandle};
use crate::config::{Config, ConfigError, ConsensusConfig};
use crate::consensus::merge::{apply_adjustments, merge_by_token, rank_and_filter, Candidate};
use crate::metrics::{AgentFailure, Metrics};
use crate::models::agent::AgentStatus;
use crate::models::consensus::{ConsensusResult, TradeOutcome};
use crate::models::market::MarketSnapshot;
use crate::models::signal::{AgentAnalysis, MacroVerdict};
use crate::services::credentials::CredentialStore;
use chrono::Utc;
use futures_util::future::join_all;
use futures_util::FutureExt;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("no agents configured")]
    NoAgents,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Uninitialized,
    Initializing,
    /// At least one agent initialized; never left once reached
    Ready,
}

/// One agent's contribution to a round
struct AgentRound {
    agent: String,
    history_adjustment: f64,
    analysis: Option<AgentAnalysis>,
}

pub struct ConsensusOrchestrator {
    agents: Vec<Box<dyn Agent>>,
    config: ConsensusConfig,
    state: OrchestratorState,
    history: VecDeque<ConsensusResult>,
    metrics: Option<Arc<Metrics>>,
}

impl ConsensusOrchestrator {
    pub fn new(agents: Vec<Box<dyn Agent>>, config: ConsensusConfig) -> Result<Self, ConsensusError> {
        if agents.is_empty() {
            error!("ConsensusOrchestrator: no agents constructible");
            return Err(ConsensusError::NoAgents);
        }
        let capacity = config.history_capacity.max(1);
        Ok(Self {
            agents,
            config,
            state: OrchestratorState::Uninitialized,
            history: VecDeque::with_capacity(capacity),
            metrics: None,
        })
    }

    /// Build the agents enabled in `config`
    pub fn from_config(config: &Config) -> Result<Self, ConsensusError> {
        let agents = build_agents(config)?;
        Self::new(agents, config.consensus.clone())
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    /// Initialize every agent; returns how many are usable
    pub async fn initialize(&mut self, credentials: &dyn CredentialStore) -> usize {
        if self.state != OrchestratorState::Ready {
            self.state = OrchestratorState::Initializing;
        }

        let mut ready = 0;
        for agent in self.agents.iter_mut() {
            if agent.initialize(credentials).await {
                ready += 1;
            }
        }

        if ready > 0 {
            self.state = OrchestratorState::Ready;
        } else if self.state != OrchestratorState::Ready {
            self.state = OrchestratorState::Uninitialized;
        }

        info!(
            ready,
            total = self.agents.len(),
            state = ?self.state,
            "ConsensusOrchestrator: {} of {} agents initialized",
            ready,
            self.agents.len()
        );
        ready
    }

    /// Run one consensus round. `None` when no agent produced a result.
    pub async fn get_consensus(&mut self, snapshot: &MarketSnapshot) -> Option<ConsensusResult> {
        if self.state != OrchestratorState::Ready {
            warn!(state = ?self.state, "ConsensusOrchestrator: not ready, skipping round");
            return None;
        }

        let started = Instant::now();
        let limit = Duration::from_millis(self.config.agent_timeout_ms);
        let metrics = self.metrics.clone();
        if let Some(m) = &metrics {
            m.rounds_total.inc();
        }

        let rounds = join_all(
            self.agents
                .iter_mut()
                .filter(|agent| agent.is_initialized())
                .map(|agent| run_agent(agent.as_mut(), snapshot, limit, metrics.as_deref())),
        )
        .await;

        let mut agents_consulted = Vec::new();
        let mut candidates = Vec::new();
        let mut verdict: Option<MacroVerdict> = None;
        for round in rounds {
            let Some(analysis) = round.analysis else {
                continue;
            };
            agents_consulted.push(round.agent.clone());
            match analysis {
                AgentAnalysis::Signals { signals } => {
                    candidates.extend(signals.into_iter().map(|signal| Candidate {
                        agent: round.agent.clone(),
                        signal,
                        history_adjustment: round.history_adjustment,
                    }));
                }
                AgentAnalysis::Macro { verdict: incoming } => {
                    let stronger = verdict
                        .as_ref()
                        .map_or(true, |current| incoming.confidence > current.confidence);
                    if stronger {
                        verdict = Some(incoming);
                    }
                }
            }
        }

        if agents_consulted.is_empty() {
            warn!("ConsensusOrchestrator: no agent produced a result this round");
            if let Some(m) = &metrics {
                m.empty_rounds_total.inc();
                m.round_duration_seconds.observe(started.elapsed().as_secs_f64());
            }
            return None;
        }

        let candidate_count = candidates.len();
        let adjusted = apply_adjustments(candidates, verdict.as_ref(), &self.config);
        let merged = merge_by_token(adjusted, self.config.merge_policy);
        let signals = rank_and_filter(merged, self.config.consensus_threshold);

        let result = ConsensusResult {
            signals,
            market_sentiment: verdict.as_ref().map(|v| v.sentiment),
            market_condition: verdict.as_ref().map(|v| v.condition),
            macro_confidence: verdict.as_ref().map(|v| v.confidence),
            recommended_assets: verdict.map(|v| v.recommended_assets).unwrap_or_default(),
            agents_consulted,
            timestamp: Utc::now(),
        };

        info!(
            agents = result.agents_consulted.len(),
            candidates = candidate_count,
            signals = result.signals.len(),
            sentiment = ?result.market_sentiment,
            "ConsensusOrchestrator: round complete, {} of {} signals passed",
            result.signals.len(),
            candidate_count
        );
        if let Some(m) = &metrics {
            m.signals_emitted_total.inc_by(result.signals.len() as u64);
            m.round_duration_seconds.observe(started.elapsed().as_secs_f64());
        }

        self.push_history(result.clone());
        Some(result)
    }

    /// Feed a trade result back to every agent that contributed to it.
    /// Returns how many agents were updated.
    pub fn update_agent_success_rates(&mut self, outcome: &TradeOutcome) -> usize {
        let mut updated = 0;
        for agent in self.agents.iter_mut() {
            if outcome.agents_consulted.iter().any(|name| name == agent.name()) {
                agent.record_outcome(outcome.profitable);
                updated += 1;
            }
        }
        debug!(
            updated,
            profitable = outcome.profitable,
            "ConsensusOrchestrator: success rates updated"
        );
        updated
    }

    pub fn agent_statuses(&self) -> Vec<AgentStatus> {
        self.agents.iter().map(|agent| agent.status()).collect()
    }

    /// Handles that keep reporting while a round holds the agents
    pub fn status_handles(&self) -> Vec<AgentStatusHandle> {
        self.agents.iter().map(|agent| agent.status_handle()).collect()
    }

    pub fn agent(&self, name: &str) -> Option<&dyn Agent> {
        self.agents
            .iter()
            .find(|agent| agent.name() == name)
            .map(|agent| agent.as_ref())
    }

    /// Retained results, oldest first
    pub fn history(&self) -> impl Iterator<Item = &ConsensusResult> {
        self.history.iter()
    }

    pub fn latest(&self) -> Option<&ConsensusResult> {
        self.history.back()
    }

    fn push_history(&mut self, result: ConsensusResult) {
        while self.history.len() >= self.config.history_capacity.max(1) {
            self.history.pop_front();
        }
        self.history.push_back(result);
    }
}

/// Analyze with a deadline; errors, timeouts and panics count as no result
async fn run_agent(
    agent: &mut dyn Agent,
    snapshot: &MarketSnapshot,
    limit: Duration,
    metrics: Option<&Metrics>,
) -> AgentRound {
    let name = agent.name().to_string();
    let history_adjustment = agent.confidence_adjustment();

    let outcome = tokio::time::timeout(limit, AssertUnwindSafe(agent.analyze(snapshot)).catch_unwind()).await;

    let failure = match &outcome {
        Ok(Ok(Some(_))) => None,
        Ok(Ok(None)) if agent.core().last_error().is_some() => Some(AgentFailure::Error),
        Ok(Ok(None)) => Some(AgentFailure::Empty),
        Ok(Err(_)) => {
            error!(agent = %name, "Agent panicked during analysis");
            agent.abandon_call();
            Some(AgentFailure::Panic)
        }
        Err(_) => {
            warn!(agent = %name, timeout_ms = limit.as_millis() as u64, "Agent timed out");
            agent.abandon_call();
            Some(AgentFailure::Timeout)
        }
    };
    if let (Some(failure), Some(m)) = (failure, metrics) {
        m.record_agent_failure(&name, failure);
    }

    AgentRound {
        agent: name,
        history_adjustment,
        analysis: outcome.ok().and_then(|r| r.ok()).flatten(),
    }
}
