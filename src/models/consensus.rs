use crate::models::signal::{AgentSignal, MarketCondition, Sentiment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signal after history and macro adjustment, with its audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSignal {
    #[serde(flatten)]
    pub signal: AgentSignal,
    pub agent: String,
    pub original_confidence: f64,
    pub history_adjustment: f64,
    pub macro_adjustment: f64,
}

impl RankedSignal {
    pub fn confidence(&self) -> f64 {
        self.signal.confidence
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Highest confidence first
    pub signals: Vec<RankedSignal>,
    pub market_sentiment: Option<Sentiment>,
    pub market_condition: Option<MarketCondition>,
    pub macro_confidence: Option<f64>,
    #[serde(default)]
    pub recommended_assets: Vec<String>,
    pub agents_consulted: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Post-trade feedback for the agents behind a consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub agents_consulted: Vec<String>,
    pub profitable: bool,
}

impl TradeOutcome {
    pub fn for_result(result: &ConsensusResult, profitable: bool) -> Self {
        Self {
            agents_consulted: result.agents_consulted.clone(),
            profitable,
        }
    }
}
