use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Sell,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
}

impl Sentiment {
    /// +1 when the sentiment backs `action`, -1 when it opposes it, 0 for monitor
    pub fn alignment(self, action: SignalAction) -> f64 {
        match (self, action) {
            (Sentiment::Bullish, SignalAction::Buy) | (Sentiment::Bearish, SignalAction::Sell) => 1.0,
            (Sentiment::Bullish, SignalAction::Sell) | (Sentiment::Bearish, SignalAction::Buy) => -1.0,
            (_, SignalAction::Monitor) => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketCondition {
    Volatile,
    Stable,
}

/// A per-token opinion emitted by an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSignal {
    pub token_id: String,
    pub action: SignalAction,
    pub confidence: f64,
    pub rationale: String,
    /// Indicator values the opinion was formed from
    #[serde(default)]
    pub source_indicators: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub entry_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub take_profit: Option<f64>,
}

impl AgentSignal {
    pub fn new(token_id: impl Into<String>, action: SignalAction, confidence: f64) -> Self {
        Self {
            token_id: token_id.into(),
            action,
            confidence,
            rationale: String::new(),
            source_indicators: BTreeMap::new(),
            entry_price: None,
            take_profit: None,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    pub fn with_indicator(mut self, name: &str, value: f64) -> Self {
        self.source_indicators.insert(name.to_string(), value);
        self
    }

    /// Attach an entry at `price` and a take-profit `pct` away in the trade's direction
    pub fn with_targets(mut self, price: f64, pct: f64) -> Self {
        let target = match self.action {
            SignalAction::Buy => Some(price * (1.0 + pct)),
            SignalAction::Sell => Some(price * (1.0 - pct)),
            SignalAction::Monitor => None,
        };
        if target.is_some() {
            self.entry_price = Some(price);
        }
        self.take_profit = target;
        self
    }
}

/// The market-wide reading produced by the macro analyst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroVerdict {
    pub sentiment: Sentiment,
    pub condition: MarketCondition,
    pub confidence: f64,
    pub recommended_assets: Vec<String>,
    pub rationale: String,
}

/// What one agent contributed to a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentAnalysis {
    Signals { signals: Vec<AgentSignal> },
    Macro { verdict: MacroVerdict },
}

impl AgentAnalysis {
    pub fn signal_count(&self) -> usize {
        match self {
            AgentAnalysis::Signals { signals } => signals.len(),
            AgentAnalysis::Macro { .. } => 0,
        }
    }
}

/// An analysis retained by an agent for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub timestamp: DateTime<Utc>,
    pub analysis: AgentAnalysis,
}
