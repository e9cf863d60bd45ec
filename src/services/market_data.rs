//! Market data provider interface feeding the consensus rounds.

use crate::indicators::validate_series;
use crate::models::market::MarketSnapshot;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("no market snapshot available yet")]
    Unavailable,
    #[error("token {token_id}: price series out of order at index {index}")]
    Unordered { token_id: String, index: usize },
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest snapshot: chronological price series per token plus new listings
    async fn snapshot(&self) -> Result<MarketSnapshot, MarketDataError>;
}

/// Serves whatever snapshot was last published to it
#[derive(Clone, Default)]
pub struct StaticMarketDataProvider {
    snapshot: Arc<RwLock<Option<MarketSnapshot>>>,
}

impl StaticMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the served snapshot after checking every series is chronological
    pub async fn publish(&self, snapshot: MarketSnapshot) -> Result<(), MarketDataError> {
        for token in &snapshot.tokens {
            if let Err(crate::indicators::IndicatorError::UnorderedSeries { index }) =
                validate_series(&token.prices)
            {
                return Err(MarketDataError::Unordered {
                    token_id: token.token_id.clone(),
                    index,
                });
            }
        }
        *self.snapshot.write().await = Some(snapshot);
        Ok(())
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketDataProvider {
    async fn snapshot(&self) -> Result<MarketSnapshot, MarketDataError> {
        self.snapshot
            .read()
            .await
            .clone()
            .ok_or(MarketDataError::Unavailable)
    }
}
