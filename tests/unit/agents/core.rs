//! Unit tests for agent lifecycle and bookkeeping

use crate::test_utils::{base_date, token, trending_prices};
use embassy_signals::agents::{
    Agent, AgentCore, TechnicalTrader, AGENT_HISTORY_CAPACITY, MIN_OUTCOMES_FOR_ADJUSTMENT,
};
use embassy_signals::agents::AgentError;
use embassy_signals::config::TechnicalConfig;
use embassy_signals::indicators::IndicatorError;
use embassy_signals::models::{AgentSpecialty, MarketSnapshot};
use embassy_signals::services::StaticCredentialStore;

fn credentials() -> StaticCredentialStore {
    StaticCredentialStore::new().with("MARKET_DATA_API_KEY", "test-key")
}

#[test]
fn test_success_rate_undefined_until_minimum() {
    let mut core = AgentCore::new("a", AgentSpecialty::Technical);
    for _ in 0..MIN_OUTCOMES_FOR_ADJUSTMENT - 1 {
        core.record_outcome(true);
    }
    assert_eq!(core.success_rate(), None);
    assert_eq!(core.confidence_adjustment(), 0.0);

    core.record_outcome(true);
    assert_eq!(core.success_rate(), Some(1.0));
    assert!((core.confidence_adjustment() - 0.2).abs() < 1e-12);
}

#[test]
fn test_success_rate_running_mean() {
    let mut core = AgentCore::new("a", AgentSpecialty::Macro);
    for i in 0..20 {
        core.record_outcome(i % 4 == 0);
    }
    let rate = core.success_rate().unwrap();
    assert!((rate - 0.25).abs() < 1e-9);
    assert!((core.confidence_adjustment() - (-0.1)).abs() < 1e-9);
}

#[test]
fn test_success_rate_bounded() {
    let mut core = AgentCore::new("a", AgentSpecialty::Discovery);
    for _ in 0..50 {
        core.record_outcome(false);
        let status = core.status();
        if let Some(rate) = status.success_rate {
            assert!((0.0..=1.0).contains(&rate));
        }
    }
    assert_eq!(core.success_rate(), Some(0.0));
    assert!((core.confidence_adjustment() + 0.2).abs() < 1e-12);
}

#[tokio::test]
async fn test_initialize_requires_credential() {
    let mut agent = TechnicalTrader::new(TechnicalConfig::default());
    assert!(!agent.initialize(&StaticCredentialStore::new()).await);
    assert!(!agent.is_initialized());

    assert!(agent.initialize(&credentials()).await);
    assert!(agent.is_initialized());
    assert_eq!(agent.core().api_handle(), Some("test-key"));

    // Idempotent
    assert!(agent.initialize(&StaticCredentialStore::new()).await);
}

#[tokio::test]
async fn test_analyze_uninitialized_returns_none() {
    let mut agent = TechnicalTrader::new(TechnicalConfig::default());
    let snapshot = MarketSnapshot::new(base_date()).with_token(token("SOL", trending_prices(40, 10.0, 0.5)));
    assert!(agent.analyze(&snapshot).await.is_none());
    assert_eq!(agent.status().call_count, 0);
}

#[tokio::test]
async fn test_analysis_history_is_capped() {
    let mut agent = TechnicalTrader::new(TechnicalConfig::default());
    agent.initialize(&credentials()).await;
    let snapshot = MarketSnapshot::new(base_date()).with_token(token("SOL", trending_prices(40, 10.0, 0.5)));

    for _ in 0..AGENT_HISTORY_CAPACITY + 2 {
        assert!(agent.analyze(&snapshot).await.is_some());
    }

    let status = agent.status();
    assert_eq!(status.call_count, (AGENT_HISTORY_CAPACITY + 2) as u64);
    assert_eq!(status.pending_calls, 0);
    assert_eq!(agent.core().history().count(), AGENT_HISTORY_CAPACITY);
}

#[test]
fn test_abandoned_call_releases_pending_slot() {
    let mut core = AgentCore::new("a", AgentSpecialty::Technical);
    core.begin_call();
    assert_eq!(core.status().pending_calls, 1);
    core.finish_call(None);
    assert_eq!(core.status().pending_calls, 0);
    assert_eq!(core.history().count(), 0);
}

#[test]
fn test_failed_call_is_recorded() {
    let mut core = AgentCore::new("a", AgentSpecialty::Technical);
    core.begin_call();
    let error: AgentError = IndicatorError::invalid("rsi", "bad period").into();
    core.fail_call(&error);
    assert_eq!(core.status().pending_calls, 0);
    assert_eq!(core.status().failed_calls, 1);
    assert!(core.last_error().is_some());

    // A new call clears the previous error but keeps the count
    core.begin_call();
    assert!(core.last_error().is_none());
    core.finish_call(None);
    assert_eq!(core.status().failed_calls, 1);
    assert_eq!(core.status().call_count, 2);
}

#[test]
fn test_status_handle_tracks_core() {
    let mut core = AgentCore::new("a", AgentSpecialty::Macro);
    let handle = core.status_handle();
    assert_eq!(handle.name(), "a");

    core.begin_call();
    assert_eq!(handle.status().pending_calls, 1);
    for _ in 0..MIN_OUTCOMES_FOR_ADJUSTMENT {
        core.record_outcome(true);
    }
    core.finish_call(None);

    let status = handle.status();
    assert_eq!(status, core.status());
    assert_eq!(status.pending_calls, 0);
    assert_eq!(status.success_rate, Some(1.0));
}
