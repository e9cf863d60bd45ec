//! Consensus demo
//!
//! Builds the enabled agents from the environment, feeds them a synthetic
//! market snapshot and prints the resulting consensus as JSON.

use chrono::{Duration, Utc};
use embassy_signals::config::Config;
use embassy_signals::consensus::ConsensusOrchestrator;
use embassy_signals::logging;
use embassy_signals::metrics::Metrics;
use embassy_signals::models::{
    MarketSnapshot, NewTokenListing, PricePoint, TokenMarketData, TradeOutcome,
};
use embassy_signals::services::{
    CredentialStore, EnvCredentialStore, MarketDataProvider, StaticCredentialStore,
    StaticMarketDataProvider,
};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_logging();

    info!(environment = %config.environment, "Starting consensus demo");

    let metrics = Arc::new(Metrics::new()?);
    let mut orchestrator = ConsensusOrchestrator::from_config(&config)?.with_metrics(metrics.clone());

    // Sandbox runs without real API keys
    let credentials: Box<dyn CredentialStore> = if config.is_production() {
        Box::new(EnvCredentialStore)
    } else {
        Box::new(
            StaticCredentialStore::new()
                .with(config.technical.credential_key.clone(), "sandbox")
                .with(config.discovery.credential_key.clone(), "sandbox")
                .with(config.macro_analyst.credential_key.clone(), "sandbox"),
        )
    };

    let ready = orchestrator.initialize(credentials.as_ref()).await;
    if ready == 0 {
        return Err("no agent could be initialized".into());
    }

    let provider = StaticMarketDataProvider::new();
    provider.publish(demo_snapshot()).await?;
    let snapshot = provider.snapshot().await?;

    match orchestrator.get_consensus(&snapshot).await {
        Some(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            let updated = orchestrator.update_agent_success_rates(&TradeOutcome::for_result(&result, true));
            info!(updated, "Recorded demo trade outcome");
        }
        None => warn!("No consensus could be formed"),
    }

    for status in orchestrator.agent_statuses() {
        println!("{}", serde_json::to_string(&status)?);
    }
    print!("{}", metrics.gather_text()?);

    Ok(())
}

fn demo_snapshot() -> MarketSnapshot {
    let now = Utc::now();
    let series = |base: f64, step: f64| -> Vec<PricePoint> {
        (0..60)
            .map(|i| {
                let close = base + step * i as f64;
                PricePoint::new(
                    now - Duration::days(60 - i),
                    close - step / 2.0,
                    close + base * 0.01,
                    close - base * 0.01,
                    close,
                )
                .with_volume(1_000.0 + 10.0 * i as f64)
            })
            .collect()
    };

    MarketSnapshot::new(now)
        .with_token(TokenMarketData::new("SOL", series(100.0, 1.5)))
        .with_token(TokenMarketData::new("ETH", series(3_000.0, -12.0)))
        .with_new_token(NewTokenListing {
            token_id: "NEWCOIN".to_string(),
            symbol: Some("NEW".to_string()),
            name: Some("New Coin".to_string()),
            description: Some("Freshly launched token".to_string()),
            logo_uri: Some("https://example.com/new.png".to_string()),
            twitter: Some("@newcoin".to_string()),
            volume_24h: 150_000.0,
            launched_at: now - Duration::hours(6),
            price: Some(0.042),
            ..Default::default()
        })
}
