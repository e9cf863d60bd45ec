//! Technical-pattern analyzer: votes bullish/bearish across trend and
//! momentum indicators for every token with price history.

use crate::agents::{Agent, AgentCore, AgentError};
use crate::config::TechnicalConfig;
use crate::indicators::momentum::{calculate_macd, calculate_rsi, detect_crossover, MacdTrend};
use crate::indicators::trend::{calculate_adx, calculate_ema, calculate_sma};
use crate::indicators::volatility::calculate_bollinger_bands;
use crate::indicators::IndicatorError;
use crate::models::agent::AgentSpecialty;
use crate::models::market::{MarketSnapshot, TokenMarketData};
use crate::models::signal::{AgentAnalysis, AgentSignal, SignalAction};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct TechnicalTrader {
    core: AgentCore,
    config: TechnicalConfig,
}

#[derive(Debug, Default)]
struct Votes {
    bullish: u32,
    bearish: u32,
    reasons: Vec<String>,
}

impl Votes {
    fn bull(&mut self, weight: u32, reason: String) {
        self.bullish += weight;
        self.reasons.push(reason);
    }

    fn bear(&mut self, weight: u32, reason: String) {
        self.bearish += weight;
        self.reasons.push(reason);
    }

    fn total(&self) -> u32 {
        self.bullish + self.bearish
    }
}

/// Treat a short window as a missing vote rather than a failure
fn optional<T>(result: Result<T, IndicatorError>) -> Result<Option<T>, IndicatorError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_insufficient_data() => Ok(None),
        Err(e) => Err(e),
    }
}

impl TechnicalTrader {
    pub fn new(config: TechnicalConfig) -> Self {
        Self {
            core: AgentCore::new("technical-trader", AgentSpecialty::Technical),
            config,
        }
    }

    pub fn config(&self) -> &TechnicalConfig {
        &self.config
    }

    /// Score one token. `Ok(None)` when no indicator had enough history.
    pub fn score_token(&self, token: &TokenMarketData) -> Result<Option<AgentSignal>, IndicatorError> {
        let cfg = &self.config;
        let prices = &token.prices;
        let Some(close) = token.last_close() else {
            return Ok(None);
        };

        let mut votes = Votes::default();
        let mut signal_indicators: Vec<(&str, f64)> = vec![("price", close)];

        if let Some(sma) = optional(calculate_sma(prices, cfg.sma_period))? {
            if let Some(&current) = sma.last() {
                signal_indicators.push(("sma", current));
                if close > current {
                    votes.bull(1, format!("price above SMA{}", cfg.sma_period));
                } else if close < current {
                    votes.bear(1, format!("price below SMA{}", cfg.sma_period));
                }

                let earlier = sma
                    .len()
                    .checked_sub(1 + cfg.slope_lookback)
                    .and_then(|i| sma.get(i));
                if let Some(&earlier) = earlier {
                    if current > earlier {
                        votes.bull(1, format!("SMA{} rising", cfg.sma_period));
                    } else if current < earlier {
                        votes.bear(1, format!("SMA{} falling", cfg.sma_period));
                    }
                }
            }
        }

        let fast = optional(calculate_ema(prices, cfg.ema_fast))?;
        let slow = optional(calculate_ema(prices, cfg.ema_slow))?;
        if let (Some(&fast), Some(&slow)) = (
            fast.as_ref().and_then(|s| s.last()),
            slow.as_ref().and_then(|s| s.last()),
        ) {
            signal_indicators.push(("ema_fast", fast));
            signal_indicators.push(("ema_slow", slow));
            if slow != 0.0 {
                signal_indicators.push(("ma_spread", (fast - slow) / slow));
            }
            if fast > slow {
                votes.bull(1, format!("EMA{} above EMA{}", cfg.ema_fast, cfg.ema_slow));
            } else if fast < slow {
                votes.bear(1, format!("EMA{} below EMA{}", cfg.ema_fast, cfg.ema_slow));
            }
        }

        if let Some(&rsi) = optional(calculate_rsi(prices, cfg.rsi_period))?
            .as_ref()
            .and_then(|s| s.last())
        {
            signal_indicators.push(("rsi", rsi));
            if rsi >= cfg.rsi_overbought {
                votes.bear(2, format!("RSI overbought at {:.1}", rsi));
            } else if rsi <= cfg.rsi_oversold {
                votes.bull(2, format!("RSI oversold at {:.1}", rsi));
            } else if rsi > 50.0 {
                votes.bull(1, format!("RSI {:.1} above midline", rsi));
            } else if rsi < 50.0 {
                votes.bear(1, format!("RSI {:.1} below midline", rsi));
            }
        }

        if let Some(macd) = optional(calculate_macd(
            prices,
            cfg.macd_fast,
            cfg.macd_slow,
            cfg.macd_signal,
        ))? {
            if let Some(point) = macd.last() {
                signal_indicators.push(("macd", point.macd));
                if let Some(signal) = point.signal {
                    signal_indicators.push(("macd_signal", signal));
                }
                if let Some(histogram) = point.histogram {
                    signal_indicators.push(("macd_histogram", histogram));
                }
            }
            match detect_crossover(&macd) {
                Some(MacdTrend::BullishCrossover) => votes.bull(2, "MACD bullish crossover".into()),
                Some(MacdTrend::BearishCrossover) => votes.bear(2, "MACD bearish crossover".into()),
                Some(MacdTrend::Bullish) => votes.bull(2, "MACD histogram positive".into()),
                Some(MacdTrend::Bearish) => votes.bear(2, "MACD histogram negative".into()),
                Some(MacdTrend::Flat) => {}
                // Signal line not formed yet: fall back to the zero line
                None => match macd.last() {
                    Some(point) if point.macd > 0.0 => {
                        votes.bull(2, "MACD line above zero".into())
                    }
                    Some(point) if point.macd < 0.0 => {
                        votes.bear(2, "MACD line below zero".into())
                    }
                    _ => {}
                },
            }
        }

        // Context only, not voted on
        if let Some(point) = optional(calculate_adx(prices, cfg.adx_period))?
            .as_ref()
            .and_then(|s| s.last())
        {
            if let Some(adx) = point.adx {
                signal_indicators.push(("adx", adx));
            }
            signal_indicators.push(("plus_di", point.plus_di));
            signal_indicators.push(("minus_di", point.minus_di));
        }
        if let Some(percent_b) = optional(calculate_bollinger_bands(
            prices,
            cfg.bollinger_period,
            cfg.bollinger_std_dev,
        ))?
        .as_ref()
        .and_then(|s| s.last())
        .and_then(|band| band.percent_b(close))
        {
            signal_indicators.push(("bollinger_percent_b", percent_b));
        }

        let total = votes.total();
        if total == 0 {
            return Ok(None);
        }

        let (action, dominant) = if votes.bullish > votes.bearish {
            (SignalAction::Buy, votes.bullish)
        } else {
            (SignalAction::Sell, votes.bearish)
        };
        let confidence = dominant as f64 / total as f64;

        let rationale = format!(
            "{} of {} weighted votes {}: {}",
            dominant,
            total,
            if action == SignalAction::Buy { "bullish" } else { "bearish" },
            votes.reasons.join(", ")
        );

        let mut signal = AgentSignal::new(token.token_id.clone(), action, confidence)
            .with_rationale(rationale)
            .with_targets(close, cfg.take_profit_pct)
            .with_indicator("bullish_votes", votes.bullish as f64)
            .with_indicator("bearish_votes", votes.bearish as f64);
        for (name, value) in signal_indicators {
            signal = signal.with_indicator(name, value);
        }
        Ok(Some(signal))
    }
}

#[async_trait]
impl Agent for TechnicalTrader {
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

        let mut scored = 0usize;
        let mut signals = Vec::new();
        for token in &snapshot.tokens {
            match self.score_token(token) {
                Ok(Some(signal)) => {
                    scored += 1;
                    if signal.confidence >= self.config.min_confidence {
                        signals.push(signal);
                    } else {
                        debug!(
                            token = %token.token_id,
                            confidence = signal.confidence,
                            "TechnicalTrader: below threshold {:.2}", self.config.min_confidence
                        );
                    }
                }
                Ok(None) => {
                    debug!(token = %token.token_id, "TechnicalTrader: not enough history");
                }
                Err(e) => {
                    warn!(token = %token.token_id, error = %e, "TechnicalTrader: skipping token");
                }
            }
        }

        if scored == 0 {
            return Ok(None);
        }
        Ok(Some(AgentAnalysis::Signals { signals }))
    }
}
