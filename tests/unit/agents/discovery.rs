//! Unit tests for the new-token discovery agent

use crate::test_utils::base_date;
use chrono::Duration;
use embassy_signals::agents::{Agent, TokenDiscovery};
use embassy_signals::config::DiscoveryConfig;
use embassy_signals::models::{AgentAnalysis, MarketSnapshot, NewTokenListing, SignalAction};
use embassy_signals::services::StaticCredentialStore;

fn listing(id: &str, volume: f64, age_hours: i64) -> NewTokenListing {
    NewTokenListing {
        token_id: id.to_string(),
        volume_24h: volume,
        launched_at: base_date() - Duration::hours(age_hours),
        ..Default::default()
    }
}

fn complete(mut listing: NewTokenListing) -> NewTokenListing {
    listing.symbol = Some("TKN".to_string());
    listing.name = Some("Token".to_string());
    listing.description = Some("A token".to_string());
    listing.logo_uri = Some("https://example.com/logo.png".to_string());
    listing.website = Some("https://example.com".to_string());
    listing
}

#[test]
fn test_strong_listing_scores_buy() {
    let agent = TokenDiscovery::new(DiscoveryConfig::default());
    let scored = agent.score_listing(&complete(listing("A", 150_000.0, 6)), base_date());
    assert!((scored.score - 0.8).abs() < 1e-9);
    assert_eq!(scored.action, SignalAction::Buy);
    assert_eq!(scored.age_hours, 6);
    assert_eq!(scored.reasons.len(), 4);
}

#[test]
fn test_buy_boundary_is_inclusive() {
    let agent = TokenDiscovery::new(DiscoveryConfig::default());
    // 0.2 + 0.1 + 0.2 + 0.1
    let scored = agent.score_listing(&complete(listing("B", 60_000.0, 48)), base_date());
    assert_eq!(scored.score, 0.6);
    assert_eq!(scored.action, SignalAction::Buy);
}

#[test]
fn test_weak_listing_is_monitor() {
    let agent = TokenDiscovery::new(DiscoveryConfig::default());
    let scored = agent.score_listing(&listing("C", 5_000.0, 200), base_date());
    assert_eq!(scored.score, 0.0);
    assert_eq!(scored.action, SignalAction::Monitor);
}

#[test]
fn test_tier_order_does_not_matter() {
    let ascending = DiscoveryConfig {
        volume_tiers: vec![(10_000.0, 0.1), (50_000.0, 0.2), (100_000.0, 0.3)],
        recency_tiers: vec![(72, 0.1), (24, 0.2)],
        ..DiscoveryConfig::default()
    };
    let agent = TokenDiscovery::new(ascending);

    let scored = agent.score_listing(&listing("A", 200_000.0, 6), base_date());
    assert!((scored.score - 0.5).abs() < 1e-9);

    let scored = agent.score_listing(&listing("B", 60_000.0, 48), base_date());
    assert!((scored.score - 0.3).abs() < 1e-9);
}

#[test]
fn test_blank_metadata_does_not_count() {
    let mut partial = complete(listing("D", 0.0, 500));
    partial.description = Some("   ".to_string());
    partial.website = None;
    assert!(!partial.has_complete_metadata());
    assert!(!partial.has_social_presence());
}

#[tokio::test]
async fn test_evaluate_surfaces_only_buys() {
    let mut agent = TokenDiscovery::new(DiscoveryConfig::default());
    let credentials = StaticCredentialStore::new().with("TOKEN_DISCOVERY_API_KEY", "key");
    assert!(agent.initialize(&credentials).await);

    let mut priced = complete(listing("HOT", 150_000.0, 2));
    priced.price = Some(2.0);
    let snapshot = MarketSnapshot::new(base_date())
        .with_new_token(priced)
        .with_new_token(listing("COLD", 1_000.0, 300));

    let Some(AgentAnalysis::Signals { signals }) = agent.analyze(&snapshot).await else {
        panic!("expected signals");
    };
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].token_id, "HOT");
    assert_eq!(signals[0].action, SignalAction::Buy);
    assert_eq!(signals[0].entry_price, Some(2.0));
}

#[tokio::test]
async fn test_evaluate_without_listings_is_none() {
    let mut agent = TokenDiscovery::new(DiscoveryConfig::default());
    let credentials = StaticCredentialStore::new().with("TOKEN_DISCOVERY_API_KEY", "key");
    agent.initialize(&credentials).await;
    assert!(agent.analyze(&MarketSnapshot::new(base_date())).await.is_none());
}
