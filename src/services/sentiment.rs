//! Pluggable market-sentiment sources for the macro analyst.
//!
//! Every source reports a score in `[0, 1]` (0 fully bearish, 1 fully
//! bullish); readings outside that range are rejected.

use crate::models::market::MarketSnapshot;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("sentiment request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("sentiment payload could not be decoded: {0}")]
    Decode(String),
    #[error("sentiment score {0} outside [0, 1]")]
    OutOfRange(f64),
    #[error("not enough market data to derive sentiment")]
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReading {
    pub score: f64,
    pub source: String,
}

impl SentimentReading {
    pub fn new(score: f64, source: impl Into<String>) -> Result<Self, SentimentError> {
        if !(0.0..=1.0).contains(&score) {
            return Err(SentimentError::OutOfRange(score));
        }
        Ok(Self {
            score,
            source: source.into(),
        })
    }
}

#[async_trait]
pub trait SentimentSource: Send + Sync {
    fn name(&self) -> &str;

    async fn read(&self, snapshot: &MarketSnapshot) -> Result<SentimentReading, SentimentError>;
}

/// Share of tokens whose close advanced over the trailing `lookback` bars
#[derive(Debug, Clone)]
pub struct MarketBreadthSource {
    lookback: usize,
}

impl MarketBreadthSource {
    pub fn new(lookback: usize) -> Self {
        Self {
            lookback: lookback.max(1),
        }
    }
}

impl Default for MarketBreadthSource {
    fn default() -> Self {
        Self::new(7)
    }
}

#[async_trait]
impl SentimentSource for MarketBreadthSource {
    fn name(&self) -> &str {
        "market-breadth"
    }

    async fn read(&self, snapshot: &MarketSnapshot) -> Result<SentimentReading, SentimentError> {
        let mut eligible = 0usize;
        let mut advancing = 0usize;
        for token in &snapshot.tokens {
            let n = token.prices.len();
            if n <= self.lookback {
                continue;
            }
            eligible += 1;
            if token.prices[n - 1].close > token.prices[n - 1 - self.lookback].close {
                advancing += 1;
            }
        }
        if eligible == 0 {
            return Err(SentimentError::NoData);
        }
        debug!(eligible, advancing, "MarketBreadthSource: {}/{} tokens advancing", advancing, eligible);
        SentimentReading::new(advancing as f64 / eligible as f64, self.name())
    }
}

/// A constant score
#[derive(Debug, Clone)]
pub struct FixedSentimentSource {
    score: f64,
}

impl FixedSentimentSource {
    pub fn new(score: f64) -> Self {
        Self { score }
    }
}

#[async_trait]
impl SentimentSource for FixedSentimentSource {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn read(&self, _snapshot: &MarketSnapshot) -> Result<SentimentReading, SentimentError> {
        SentimentReading::new(self.score, self.name())
    }
}

#[derive(Debug, Deserialize)]
struct FearGreedResponse {
    data: Vec<FearGreedEntry>,
}

#[derive(Debug, Deserialize)]
struct FearGreedEntry {
    value: String,
}

/// Crypto Fear & Greed index over HTTP; the 0-100 index is scaled to 0-1
#[derive(Debug, Clone)]
pub struct FearGreedSource {
    client: reqwest::Client,
    url: String,
    max_retries: usize,
    min_delay: Duration,
}

impl FearGreedSource {
    pub const DEFAULT_URL: &'static str = "https://api.alternative.me/fng/?limit=1";

    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, reqwest::Client::new())
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            url: url.into(),
            max_retries: 3,
            min_delay: Duration::from_millis(200),
        }
    }

    pub fn with_retries(mut self, max_retries: usize, min_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.min_delay = min_delay;
        self
    }

    async fn fetch_once(&self) -> Result<SentimentReading, SentimentError> {
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body: FearGreedResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Decode(e.to_string()))?;
        let entry = body
            .data
            .first()
            .ok_or_else(|| SentimentError::Decode("empty data array".to_string()))?;
        let index = entry
            .value
            .trim()
            .parse::<f64>()
            .map_err(|_| SentimentError::Decode(format!("invalid index value {:?}", entry.value)))?;
        SentimentReading::new(index / 100.0, "fear-greed")
    }
}

#[async_trait]
impl SentimentSource for FearGreedSource {
    fn name(&self) -> &str {
        "fear-greed"
    }

    async fn read(&self, _snapshot: &MarketSnapshot) -> Result<SentimentReading, SentimentError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_times(self.max_retries);

        (|| async { self.fetch_once().await })
            .retry(backoff)
            .when(|e| matches!(e, SentimentError::Http(_)))
            .notify(|e, delay| {
                warn!(url = %self.url, error = %e, "FearGreedSource: retrying in {:?}", delay);
            })
            .await
    }
}
