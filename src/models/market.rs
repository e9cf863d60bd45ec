//! Market snapshot handed to every agent for one analysis round

use crate::models::indicators::PricePoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMarketData {
    pub token_id: String,
    pub prices: Vec<PricePoint>,
}

impl TokenMarketData {
    pub fn new(token_id: impl Into<String>, prices: Vec<PricePoint>) -> Self {
        Self {
            token_id: token_id.into(),
            prices,
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        self.prices.last().map(|p| p.close)
    }
}

/// Metadata of a freshly listed token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTokenListing {
    pub token_id: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    /// 24h transaction volume in quote currency
    pub volume_24h: f64,
    pub launched_at: DateTime<Utc>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl NewTokenListing {
    pub fn has_complete_metadata(&self) -> bool {
        [&self.symbol, &self.name, &self.description, &self.logo_uri]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    pub fn has_social_presence(&self) -> bool {
        [&self.website, &self.twitter, &self.telegram]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub tokens: Vec<TokenMarketData>,
    #[serde(default)]
    pub new_tokens: Vec<NewTokenListing>,
}

impl MarketSnapshot {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            tokens: Vec::new(),
            new_tokens: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: TokenMarketData) -> Self {
        self.tokens.push(token);
        self
    }

    pub fn with_new_token(mut self, listing: NewTokenListing) -> Self {
        self.new_tokens.push(listing);
        self
    }
}
