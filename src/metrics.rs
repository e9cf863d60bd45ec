//! Prometheus metrics for consensus rounds and agent health

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Reason an agent contributed nothing to a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentFailure {
    Error,
    Timeout,
    Panic,
    Empty,
}

impl AgentFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentFailure::Error => "error",
            AgentFailure::Timeout => "timeout",
            AgentFailure::Panic => "panic",
            AgentFailure::Empty => "empty",
        }
    }
}

pub struct Metrics {
    registry: Registry,
    pub rounds_total: IntCounter,
    pub empty_rounds_total: IntCounter,
    pub signals_emitted_total: IntCounter,
    pub agent_failures_total: IntCounterVec,
    pub round_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let rounds_total = IntCounter::new("consensus_rounds_total", "Consensus rounds started")?;
        let empty_rounds_total = IntCounter::new(
            "consensus_empty_rounds_total",
            "Rounds in which no agent produced a result",
        )?;
        let signals_emitted_total = IntCounter::new(
            "consensus_signals_emitted_total",
            "Signals that passed the consensus threshold",
        )?;
        let agent_failures_total = IntCounterVec::new(
            Opts::new("agent_failures_total", "Agent rounds without a usable result"),
            &["agent", "reason"],
        )?;
        let round_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "consensus_round_duration_seconds",
                "Wall time of a consensus round",
            )
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;

        registry.register(Box::new(rounds_total.clone()))?;
        registry.register(Box::new(empty_rounds_total.clone()))?;
        registry.register(Box::new(signals_emitted_total.clone()))?;
        registry.register(Box::new(agent_failures_total.clone()))?;
        registry.register(Box::new(round_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            rounds_total,
            empty_rounds_total,
            signals_emitted_total,
            agent_failures_total,
            round_duration_seconds,
        })
    }

    pub fn record_agent_failure(&self, agent: &str, failure: AgentFailure) {
        self.agent_failures_total
            .with_label_values(&[agent, failure.as_str()])
            .inc();
    }

    /// Render every registered metric in the Prometheus text format
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
