//! Runtime configuration: documented defaults overridden from the environment.

use crate::models::agent::AgentSpecialty;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("no agents enabled; set ENABLED_AGENTS to a subset of technical,discovery,macro")]
    NoAgentsEnabled,
}

/// How signals for the same token from different agents are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Keep only the highest-confidence signal per token
    KeepHighest,
    /// Average confidences of agreeing signals; disagreeing tokens keep the strongest side
    Average,
    /// Keep every signal
    KeepAll,
}

impl FromStr for MergePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keep_highest" | "highest" => Ok(MergePolicy::KeepHighest),
            "average" => Ok(MergePolicy::Average),
            "keep_all" | "all" => Ok(MergePolicy::KeepAll),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusConfig {
    /// Final gate applied after ranking
    pub consensus_threshold: f64,
    /// Scales the macro confidence into a per-signal adjustment
    pub macro_weight: f64,
    /// Ceiling for adjusted confidences
    pub max_confidence: f64,
    pub history_capacity: usize,
    pub agent_timeout_ms: u64,
    pub merge_policy: MergePolicy,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            consensus_threshold: 0.70,
            macro_weight: 0.2,
            max_confidence: 0.95,
            history_capacity: 10,
            agent_timeout_ms: 5_000,
            merge_policy: MergePolicy::KeepHighest,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalConfig {
    pub sma_period: usize,
    /// Bars between the two SMA readings compared for slope
    pub slope_lookback: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub adx_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub min_confidence: f64,
    pub take_profit_pct: f64,
    pub credential_key: String,
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self {
            sma_period: 20,
            slope_lookback: 5,
            ema_fast: 12,
            ema_slow: 26,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            adx_period: 14,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            min_confidence: 0.70,
            take_profit_pct: 0.05,
            credential_key: "MARKET_DATA_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// (minimum 24h volume, score); the highest threshold met applies
    pub volume_tiers: Vec<(f64, f64)>,
    pub metadata_score: f64,
    pub social_score: f64,
    /// (maximum age in hours, score); the tightest window met applies
    pub recency_tiers: Vec<(i64, f64)>,
    pub buy_score: f64,
    pub min_confidence: f64,
    pub take_profit_pct: f64,
    pub credential_key: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            volume_tiers: vec![(100_000.0, 0.3), (50_000.0, 0.2), (10_000.0, 0.1)],
            metadata_score: 0.1,
            social_score: 0.2,
            recency_tiers: vec![(24, 0.2), (72, 0.1)],
            buy_score: 0.6,
            min_confidence: 0.60,
            take_profit_pct: 0.05,
            credential_key: "TOKEN_DISCOVERY_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroConfig {
    /// Bars used for returns and realized volatility
    pub lookback: usize,
    /// Mean per-bar return standard deviation above which the market is volatile
    pub volatility_threshold: f64,
    pub recommended_count: usize,
    pub fear_greed_url: Option<String>,
    pub credential_key: String,
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            lookback: 7,
            volatility_threshold: 0.04,
            recommended_count: 3,
            fear_greed_url: None,
            credential_key: "MACRO_SENTIMENT_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub enabled_agents: Vec<AgentSpecialty>,
    pub consensus: ConsensusConfig,
    pub technical: TechnicalConfig,
    pub discovery: DiscoveryConfig,
    pub macro_analyst: MacroConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            enabled_agents: vec![
                AgentSpecialty::Technical,
                AgentSpecialty::Discovery,
                AgentSpecialty::Macro,
            ],
            consensus: ConsensusConfig::default(),
            technical: TechnicalConfig::default(),
            discovery: DiscoveryConfig::default(),
            macro_analyst: MacroConfig::default(),
        }
    }
}

impl Config {
    /// Load `.env` if present and overlay environment variables on the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(env) = lookup("APP_ENV") {
            config.environment = env.to_lowercase();
        }
        if let Some(raw) = lookup("ENABLED_AGENTS") {
            config.enabled_agents = parse_agents(&raw)?;
        }

        let c = &mut config.consensus;
        c.consensus_threshold = read_unit(&lookup, "CONSENSUS_THRESHOLD", c.consensus_threshold)?;
        c.macro_weight = read_unit(&lookup, "MACRO_WEIGHT", c.macro_weight)?;
        c.max_confidence = read_unit(&lookup, "MAX_CONFIDENCE", c.max_confidence)?;
        c.history_capacity = read_parsed(&lookup, "CONSENSUS_HISTORY", c.history_capacity)?;
        c.agent_timeout_ms = read_parsed(&lookup, "AGENT_TIMEOUT_MS", c.agent_timeout_ms)?;
        if let Some(raw) = lookup("MERGE_POLICY") {
            c.merge_policy = raw.parse().map_err(|_| invalid("MERGE_POLICY", &raw))?;
        }

        config.technical.min_confidence = read_unit(
            &lookup,
            "TECHNICAL_MIN_CONFIDENCE",
            config.technical.min_confidence,
        )?;
        config.discovery.min_confidence = read_unit(
            &lookup,
            "DISCOVERY_MIN_CONFIDENCE",
            config.discovery.min_confidence,
        )?;
        config.macro_analyst.volatility_threshold = read_parsed(
            &lookup,
            "MACRO_VOLATILITY_THRESHOLD",
            config.macro_analyst.volatility_threshold,
        )?;
        if let Some(url) = lookup("FEAR_GREED_URL").filter(|u| !u.trim().is_empty()) {
            config.macro_analyst.fear_greed_url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled_agents.is_empty() {
            return Err(ConfigError::NoAgentsEnabled);
        }
        if self.consensus.history_capacity == 0 {
            return Err(invalid("CONSENSUS_HISTORY", "0"));
        }
        if self.consensus.agent_timeout_ms == 0 {
            return Err(invalid("AGENT_TIMEOUT_MS", "0"));
        }
        if self.consensus.max_confidence < self.consensus.consensus_threshold {
            return Err(invalid(
                "MAX_CONFIDENCE",
                &self.consensus.max_confidence.to_string(),
            ));
        }
        let volatility = self.macro_analyst.volatility_threshold;
        if volatility.is_nan() || volatility <= 0.0 {
            return Err(invalid("MACRO_VOLATILITY_THRESHOLD", &volatility.to_string()));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

/// Deployment environment from `APP_ENV`, defaulting to `sandbox`
pub fn get_environment() -> String {
    std::env::var("APP_ENV")
        .map(|v| v.to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

fn parse_agents(raw: &str) -> Result<Vec<AgentSpecialty>, ConfigError> {
    let mut agents = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let specialty = AgentSpecialty::parse(part).ok_or_else(|| invalid("ENABLED_AGENTS", part))?;
        if !agents.contains(&specialty) {
            agents.push(specialty);
        }
    }
    if agents.is_empty() {
        return Err(ConfigError::NoAgentsEnabled);
    }
    Ok(agents)
}

fn read_parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, &raw)),
        None => Ok(default),
    }
}

fn read_unit<F>(lookup: &F, key: &str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: f64 = read_parsed(lookup, key, default)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(key, &value.to_string()));
    }
    Ok(value)
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
