//! Agent framework: lifecycle, bookkeeping and the specialized analyzers.
//!
//! Each agent owns its audit history exclusively; its counters are shared
//! read-only through `AgentStatusHandle`. Analysis
//! failures never escape an agent: `analyze` logs them, yields `None`
//! and leaves the error on `AgentCore::last_error`.

pub mod discovery;
pub mod macro_analyst;
pub mod technical;

pub use discovery::TokenDiscovery;
pub use macro_analyst::MacroAnalyst;
pub use technical::TechnicalTrader;

use crate::common::math;
use crate::config::{Config, ConfigError};
use crate::indicators::IndicatorError;
use crate::models::agent::{AgentSpecialty, AgentStatus};
use crate::models::market::MarketSnapshot;
use crate::models::signal::{AgentAnalysis, AnalysisRecord};
use crate::services::credentials::CredentialStore;
use crate::services::sentiment::{
    FearGreedSource, MarketBreadthSource, SentimentError, SentimentSource,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Analyses retained per agent
pub const AGENT_HISTORY_CAPACITY: usize = 10;
/// Outcomes needed before the success rate is trusted
pub const MIN_OUTCOMES_FOR_ADJUSTMENT: u64 = 10;
/// Largest history adjustment in either direction
const MAX_HISTORY_ADJUSTMENT: f64 = 0.2;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent is not initialized")]
    NotInitialized,
    #[error("missing credential {0}")]
    MissingCredential(String),
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error(transparent)]
    Sentiment(#[from] SentimentError),
}

/// Counters readable while the owning agent is mid-analysis
#[derive(Debug, Default)]
pub struct AgentStats {
    initialized: AtomicBool,
    call_count: AtomicU64,
    pending_calls: AtomicU32,
    failed_calls: AtomicU64,
    outcomes_recorded: AtomicU64,
    success_rate_bits: AtomicU64,
}

impl AgentStats {
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn pending_calls(&self) -> u32 {
        self.pending_calls.load(Ordering::Relaxed)
    }

    pub fn failed_calls(&self) -> u64 {
        self.failed_calls.load(Ordering::Relaxed)
    }

    pub fn outcomes_recorded(&self) -> u64 {
        self.outcomes_recorded.load(Ordering::Relaxed)
    }

    /// `None` until `MIN_OUTCOMES_FOR_ADJUSTMENT` outcomes are in
    pub fn success_rate(&self) -> Option<f64> {
        (self.outcomes_recorded() >= MIN_OUTCOMES_FOR_ADJUSTMENT)
            .then(|| f64::from_bits(self.success_rate_bits.load(Ordering::Relaxed)))
    }

    fn release_pending(&self) {
        let _ = self
            .pending_calls
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }
}

/// Cloneable read-only view of one agent's status
#[derive(Debug, Clone)]
pub struct AgentStatusHandle {
    name: String,
    specialty: AgentSpecialty,
    stats: Arc<AgentStats>,
}

impl AgentStatusHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &AgentStats {
        &self.stats
    }

    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            name: self.name.clone(),
            specialty: self.specialty,
            initialized: self.stats.initialized.load(Ordering::Relaxed),
            success_rate: self.stats.success_rate(),
            call_count: self.stats.call_count(),
            outcomes_recorded: self.stats.outcomes_recorded(),
            pending_calls: self.stats.pending_calls(),
            failed_calls: self.stats.failed_calls(),
        }
    }
}

/// State every agent carries regardless of specialty
#[derive(Debug)]
pub struct AgentCore {
    handle: AgentStatusHandle,
    api_handle: Option<String>,
    last_error: Option<String>,
    history: VecDeque<AnalysisRecord>,
}

impl AgentCore {
    pub fn new(name: impl Into<String>, specialty: AgentSpecialty) -> Self {
        Self {
            handle: AgentStatusHandle {
                name: name.into(),
                specialty,
                stats: Arc::new(AgentStats::default()),
            },
            api_handle: None,
            last_error: None,
            history: VecDeque::with_capacity(AGENT_HISTORY_CAPACITY),
        }
    }

    pub fn name(&self) -> &str {
        &self.handle.name
    }

    pub fn specialty(&self) -> AgentSpecialty {
        self.handle.specialty
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.stats.initialized.load(Ordering::Relaxed)
    }

    pub fn api_handle(&self) -> Option<&str> {
        self.api_handle.as_deref()
    }

    /// Look up `key` and mark the agent initialized when found. Idempotent.
    pub fn acquire(&mut self, credentials: &dyn CredentialStore, key: &str) -> bool {
        if self.is_initialized() {
            return true;
        }
        match credentials.lookup(key) {
            Some(handle) => {
                self.api_handle = Some(handle);
                self.handle.stats.initialized.store(true, Ordering::Relaxed);
                info!(agent = %self.name(), specialty = %self.specialty(), "Agent initialized");
                true
            }
            None => {
                warn!(
                    agent = %self.name(),
                    key,
                    "Agent initialization skipped: credential {} not found", key
                );
                false
            }
        }
    }

    /// Running mean of outcomes, kept inside `[0, 1]`
    pub fn record_outcome(&mut self, was_successful: bool) {
        let stats = &self.handle.stats;
        let recorded = stats.outcomes_recorded();
        let current = f64::from_bits(stats.success_rate_bits.load(Ordering::Relaxed));
        let hit = if was_successful { 1.0 } else { 0.0 };
        let n = recorded as f64;
        let rate = math::bounded((current * n + hit) / (n + 1.0), 0.0, 1.0);
        stats.success_rate_bits.store(rate.to_bits(), Ordering::Relaxed);
        stats.outcomes_recorded.store(recorded + 1, Ordering::Relaxed);
        debug!(
            agent = %self.name(),
            success_rate = rate,
            outcomes = recorded + 1,
            "Agent outcome recorded"
        );
    }

    pub fn success_rate(&self) -> Option<f64> {
        self.handle.stats.success_rate()
    }

    /// `(success_rate - 0.5) * 0.4`, or 0 while the rate is undefined
    pub fn confidence_adjustment(&self) -> f64 {
        self.success_rate()
            .map(|rate| ((rate - 0.5) * 0.4).clamp(-MAX_HISTORY_ADJUSTMENT, MAX_HISTORY_ADJUSTMENT))
            .unwrap_or(0.0)
    }

    pub fn begin_call(&mut self) {
        self.last_error = None;
        self.handle.stats.call_count.fetch_add(1, Ordering::Relaxed);
        self.handle.stats.pending_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn finish_call(&mut self, record: Option<AnalysisRecord>) {
        self.handle.stats.release_pending();
        if let Some(record) = record {
            if self.history.len() == AGENT_HISTORY_CAPACITY {
                self.history.pop_front();
            }
            self.history.push_back(record);
        }
    }

    /// Close a call whose analysis returned an error
    pub fn fail_call(&mut self, error: &AgentError) {
        self.handle.stats.release_pending();
        self.handle.stats.failed_calls.fetch_add(1, Ordering::Relaxed);
        self.last_error = Some(error.to_string());
    }

    /// Error from the most recent call, cleared when the next one begins
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> impl Iterator<Item = &AnalysisRecord> {
        self.history.iter()
    }

    pub fn status_handle(&self) -> AgentStatusHandle {
        self.handle.clone()
    }

    pub fn status(&self) -> AgentStatus {
        self.handle.status()
    }
}

#[async_trait]
pub trait Agent: Send + Sync {
    fn core(&self) -> &AgentCore;

    fn core_mut(&mut self) -> &mut AgentCore;

    /// Credential key this specialty needs at initialization
    fn credential_key(&self) -> &str;

    /// Specialty-specific analysis. `Ok(None)` means no opinion could be formed.
    async fn evaluate(
        &mut self,
        snapshot: &MarketSnapshot,
    ) -> Result<Option<AgentAnalysis>, AgentError>;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn specialty(&self) -> AgentSpecialty {
        self.core().specialty()
    }

    fn is_initialized(&self) -> bool {
        self.core().is_initialized()
    }

    /// Returns false, leaving the agent out of consensus rounds, when the
    /// credential is missing
    async fn initialize(&mut self, credentials: &dyn CredentialStore) -> bool {
        let key = self.credential_key().to_string();
        self.core_mut().acquire(credentials, &key)
    }

    /// Run one analysis, converting every failure into `None`
    async fn analyze(&mut self, snapshot: &MarketSnapshot) -> Option<AgentAnalysis> {
        if !self.is_initialized() {
            warn!(agent = %self.name(), "analyze called on uninitialized agent");
            return None;
        }

        self.core_mut().begin_call();
        match self.evaluate(snapshot).await {
            Ok(Some(analysis)) => {
                debug!(
                    agent = %self.name(),
                    signals = analysis.signal_count(),
                    "Agent analysis complete"
                );
                self.core_mut().finish_call(Some(AnalysisRecord {
                    timestamp: snapshot.timestamp,
                    analysis: analysis.clone(),
                }));
                Some(analysis)
            }
            Ok(None) => {
                debug!(agent = %self.name(), "Agent formed no opinion");
                self.core_mut().finish_call(None);
                None
            }
            Err(e) => {
                warn!(agent = %self.name(), error = %e, "Agent analysis failed");
                self.core_mut().fail_call(&e);
                None
            }
        }
    }

    /// Release the pending slot of a call that was abandoned mid-flight
    fn abandon_call(&mut self) {
        self.core_mut().finish_call(None);
    }

    fn record_outcome(&mut self, was_successful: bool) {
        self.core_mut().record_outcome(was_successful);
    }

    fn confidence_adjustment(&self) -> f64 {
        self.core().confidence_adjustment()
    }

    fn status(&self) -> AgentStatus {
        self.core().status()
    }

    fn status_handle(&self) -> AgentStatusHandle {
        self.core().status_handle()
    }
}

/// Construct the agents enabled in `config`
pub fn build_agents(config: &Config) -> Result<Vec<Box<dyn Agent>>, ConfigError> {
    config.validate()?;

    let agents = config
        .enabled_agents
        .iter()
        .map(|specialty| -> Box<dyn Agent> {
            match specialty {
                AgentSpecialty::Technical => {
                    Box::new(TechnicalTrader::new(config.technical.clone()))
                }
                AgentSpecialty::Discovery => {
                    Box::new(TokenDiscovery::new(config.discovery.clone()))
                }
                AgentSpecialty::Macro => {
                    let source: Box<dyn SentimentSource> = match &config.macro_analyst.fear_greed_url {
                        Some(url) => Box::new(FearGreedSource::new(url.clone())),
                        None => Box::new(MarketBreadthSource::new(config.macro_analyst.lookback)),
                    };
                    Box::new(MacroAnalyst::new(config.macro_analyst.clone(), source))
                }
            }
        })
        .collect();

    Ok(agents)
}
