//! Shared data models spanning the engine layers.

pub mod agent;
pub mod consensus;
pub mod indicators;
pub mod market;
pub mod signal;

pub use agent::{AgentSpecialty, AgentStatus};
pub use consensus::{ConsensusResult, RankedSignal, TradeOutcome};
pub use indicators::{
    AdxPoint, BollingerPoint, CloudProjection, FibonacciLevel, IchimokuCloud, IchimokuPoint,
    IndicatorSeries, MacdPoint, PricePoint,
};
pub use market::{MarketSnapshot, NewTokenListing, TokenMarketData};
pub use signal::{
    AgentAnalysis, AgentSignal, AnalysisRecord, MacroVerdict, MarketCondition, Sentiment,
    SignalAction,
};
