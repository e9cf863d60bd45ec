//! New-token discovery: additive 0-1 score over volume, metadata, socials
//! and launch recency. Only `buy` verdicts are surfaced.

use crate::agents::{Agent, AgentCore, AgentError};
use crate::config::DiscoveryConfig;
use crate::models::agent::AgentSpecialty;
use crate::models::market::{MarketSnapshot, NewTokenListing};
use crate::models::signal::{AgentAnalysis, AgentSignal, SignalAction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

pub struct TokenDiscovery {
    core: AgentCore,
    config: DiscoveryConfig,
}

/// Score breakdown for one listing
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryScore {
    pub score: f64,
    pub action: SignalAction,
    pub reasons: Vec<String>,
    pub age_hours: i64,
}

impl TokenDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            core: AgentCore::new("token-discovery", AgentSpecialty::Discovery),
            config,
        }
    }

    pub fn score_listing(&self, listing: &NewTokenListing, now: DateTime<Utc>) -> DiscoveryScore {
        let cfg = &self.config;
        let mut score = 0.0;
        let mut reasons = Vec::new();

        if let Some(&(min, points)) = cfg
            .volume_tiers
            .iter()
            .filter(|(min, _)| listing.volume_24h >= *min)
            .max_by(|a, b| a.0.total_cmp(&b.0))
        {
            score += points;
            reasons.push(format!("24h volume {:.0} >= {:.0}", listing.volume_24h, min));
        }

        if listing.has_complete_metadata() {
            score += cfg.metadata_score;
            reasons.push("complete metadata".to_string());
        }

        if listing.has_social_presence() {
            score += cfg.social_score;
            reasons.push("social presence".to_string());
        }

        let age_hours = (now - listing.launched_at).num_hours().max(0);
        if let Some(&(max_hours, points)) = cfg
            .recency_tiers
            .iter()
            .filter(|(max_hours, _)| age_hours < *max_hours)
            .min_by_key(|(max_hours, _)| *max_hours)
        {
            score += points;
            reasons.push(format!("launched {}h ago (< {}h)", age_hours, max_hours));
        }

        // Tier points are decimal fractions; round away float noise before comparing
        let score = ((score * 1e6).round() / 1e6).clamp(0.0, 1.0);
        let action = if score >= cfg.buy_score {
            SignalAction::Buy
        } else {
            SignalAction::Monitor
        };

        DiscoveryScore {
            score,
            action,
            reasons,
            age_hours,
        }
    }
}

#[async_trait]
impl Agent for TokenDiscovery {
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
        if snapshot.new_tokens.is_empty() {
            return Ok(None);
        }

        let mut signals = Vec::new();
        for listing in &snapshot.new_tokens {
            let scored = self.score_listing(listing, snapshot.timestamp);
            debug!(
                token = %listing.token_id,
                score = scored.score,
                action = ?scored.action,
                "TokenDiscovery: scored listing"
            );
            if scored.action != SignalAction::Buy || scored.score < self.config.min_confidence {
                continue;
            }

            let label = listing.symbol.as_deref().unwrap_or(&listing.token_id);
            let mut signal = AgentSignal::new(listing.token_id.clone(), SignalAction::Buy, scored.score)
                .with_rationale(format!(
                    "new listing {} scored {:.2}: {}",
                    label,
                    scored.score,
                    scored.reasons.join(", ")
                ))
                .with_indicator("discovery_score", scored.score)
                .with_indicator("volume_24h", listing.volume_24h)
                .with_indicator("age_hours", scored.age_hours as f64);
            if let Some(price) = listing.price {
                signal = signal.with_targets(price, self.config.take_profit_pct);
            }
            signals.push(signal);
        }

        Ok(Some(AgentAnalysis::Signals { signals }))
    }
}
