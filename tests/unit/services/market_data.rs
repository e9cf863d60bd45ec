//! Unit tests for market data and credential collaborators

use crate::test_utils::{base_date, token, trending_prices};
use embassy_signals::models::MarketSnapshot;
use embassy_signals::services::{
    CredentialStore, MarketDataError, MarketDataProvider, StaticCredentialStore,
    StaticMarketDataProvider,
};

#[tokio::test]
async fn test_provider_unavailable_before_publish() {
    let provider = StaticMarketDataProvider::new();
    assert!(matches!(provider.snapshot().await, Err(MarketDataError::Unavailable)));
}

#[tokio::test]
async fn test_provider_serves_published_snapshot() {
    let provider = StaticMarketDataProvider::new();
    let snapshot = MarketSnapshot::new(base_date()).with_token(token("SOL", trending_prices(5, 1.0, 1.0)));
    provider.publish(snapshot).await.unwrap();

    let served = provider.snapshot().await.unwrap();
    assert_eq!(served.tokens.len(), 1);
    assert_eq!(served.tokens[0].last_close(), Some(5.0));
}

#[tokio::test]
async fn test_provider_rejects_unordered_series() {
    let provider = StaticMarketDataProvider::new();
    let mut prices = trending_prices(5, 1.0, 1.0);
    prices.swap(1, 2);
    let snapshot = MarketSnapshot::new(base_date()).with_token(token("BAD", prices));

    match provider.publish(snapshot).await {
        Err(MarketDataError::Unordered { token_id, index }) => {
            assert_eq!(token_id, "BAD");
            assert_eq!(index, 2);
        }
        other => panic!("expected Unordered, got {:?}", other),
    }
}

#[test]
fn test_static_credentials_ignore_blank_values() {
    let store = StaticCredentialStore::new().with("A", "secret").with("B", "  ");
    assert_eq!(store.lookup("A"), Some("secret".to_string()));
    assert_eq!(store.lookup("B"), None);
    assert_eq!(store.lookup("C"), None);
}
