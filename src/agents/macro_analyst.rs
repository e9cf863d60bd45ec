//! Market-wide sentiment verdict consumed by the orchestrator as a global
//! adjustment rather than as ranked signals.

use crate::agents::{Agent, AgentCore, AgentError};
use crate::common::math;
use crate::config::MacroConfig;
use crate::models::agent::AgentSpecialty;
use crate::models::market::{MarketSnapshot, TokenMarketData};
use crate::models::signal::{AgentAnalysis, MacroVerdict, MarketCondition, Sentiment};
use crate::services::sentiment::SentimentSource;
use async_trait::async_trait;
use std::cmp::Ordering;
use tracing::debug;

pub struct MacroAnalyst {
    core: AgentCore,
    config: MacroConfig,
    source: Box<dyn SentimentSource>,
}

/// Trailing return and realized volatility of one token
#[derive(Debug, Clone, PartialEq)]
struct TokenStats {
    token_id: String,
    trailing_return: f64,
    volatility: f64,
}

impl MacroAnalyst {
    pub fn new(config: MacroConfig, source: Box<dyn SentimentSource>) -> Self {
        Self {
            core: AgentCore::new("macro-analyst", AgentSpecialty::Macro),
            config,
            source,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    fn token_stats(&self, token: &TokenMarketData) -> Option<TokenStats> {
        let lookback = self.config.lookback.max(1);
        let n = token.prices.len();
        if n <= lookback {
            return None;
        }
        let window = &token.prices[n - 1 - lookback..];
        let returns: Vec<f64> = window
            .windows(2)
            .filter(|pair| pair[0].close != 0.0)
            .map(|pair| pair[1].close / pair[0].close - 1.0)
            .collect();
        let volatility = math::standard_deviation(&returns, returns.len())?;
        let first = window.first()?.close;
        let last = window.last()?.close;
        if first == 0.0 {
            return None;
        }
        Some(TokenStats {
            token_id: token.token_id.clone(),
            trailing_return: last / first - 1.0,
            volatility,
        })
    }
}

#[async_trait]
impl Agent for MacroAnalyst {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn credential_key(&self) -> &str {
        &self.config.credential_key
    }

    async fn evaluate(
        &mut self,
        snapshot: &MarketSnapshot,
    ) -> Result<Option<AgentAnalysis>, AgentError> {
        if !self.core.is_initialized() {
            return Err(AgentError::NotInitialized);
        }

        let reading = self.source.read(snapshot).await?;
        let sentiment = if reading.score >= 0.5 {
            Sentiment::Bullish
        } else {
            Sentiment::Bearish
        };
        let confidence = math::bounded((reading.score - 0.5).abs() * 2.0, 0.0, 1.0);

        let mut stats: Vec<TokenStats> = snapshot
            .tokens
            .iter()
            .filter_map(|token| self.token_stats(token))
            .collect();

        let mean_volatility = if stats.is_empty() {
            0.0
        } else {
            stats.iter().map(|s| s.volatility).sum::<f64>() / stats.len() as f64
        };
        let condition = if mean_volatility > self.config.volatility_threshold {
            MarketCondition::Volatile
        } else {
            MarketCondition::Stable
        };

        // Bullish: strongest performers. Bearish: calmest assets.
        match sentiment {
            Sentiment::Bullish => stats.sort_by(|a, b| {
                b.trailing_return
                    .partial_cmp(&a.trailing_return)
                    .unwrap_or(Ordering::Equal)
            }),
            Sentiment::Bearish => stats.sort_by(|a, b| {
                a.volatility
                    .partial_cmp(&b.volatility)
                    .unwrap_or(Ordering::Equal)
            }),
        }
        let recommended_assets: Vec<String> = stats
            .into_iter()
            .take(self.config.recommended_count)
            .map(|s| s.token_id)
            .collect();

        debug!(
            source = %reading.source,
            score = reading.score,
            mean_volatility,
            "MacroAnalyst: verdict formed"
        );

        let rationale = format!(
            "{} score {:.2}, mean volatility {:.4} vs threshold {:.4}",
            reading.source, reading.score, mean_volatility, self.config.volatility_threshold
        );

        Ok(Some(AgentAnalysis::Macro {
            verdict: MacroVerdict {
                sentiment,
                condition,
                confidence,
                recommended_assets,
                rationale,
            },
        }))
    }
}
