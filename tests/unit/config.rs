//! Unit tests for configuration loading

use embassy_signals::config::{Config, ConfigError, MergePolicy};
use embassy_signals::models::AgentSpecialty;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = Config::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.environment, "sandbox");
    assert_eq!(config.enabled_agents.len(), 3);
    assert_eq!(config.consensus.consensus_threshold, 0.70);
    assert_eq!(config.consensus.macro_weight, 0.2);
    assert_eq!(config.consensus.max_confidence, 0.95);
    assert_eq!(config.consensus.history_capacity, 10);
    assert_eq!(config.consensus.merge_policy, MergePolicy::KeepHighest);
    assert_eq!(config.technical.min_confidence, 0.70);
    assert_eq!(config.discovery.min_confidence, 0.60);
    assert!(config.macro_analyst.fear_greed_url.is_none());
    assert!(!config.is_production());
}

#[test]
fn test_overrides() {
    let config = Config::from_lookup(lookup(&[
        ("APP_ENV", "Production"),
        ("ENABLED_AGENTS", "macro, technical,macro"),
        ("CONSENSUS_THRESHOLD", "0.8"),
        ("AGENT_TIMEOUT_MS", "250"),
        ("MERGE_POLICY", "average"),
        ("FEAR_GREED_URL", "http://localhost:9/fng"),
    ]))
    .unwrap();

    assert!(config.is_production());
    assert_eq!(
        config.enabled_agents,
        vec![AgentSpecialty::Macro, AgentSpecialty::Technical]
    );
    assert_eq!(config.consensus.consensus_threshold, 0.8);
    assert_eq!(config.consensus.agent_timeout_ms, 250);
    assert_eq!(config.consensus.merge_policy, MergePolicy::Average);
    assert_eq!(
        config.macro_analyst.fear_greed_url.as_deref(),
        Some("http://localhost:9/fng")
    );
}

#[test]
fn test_invalid_values_rejected() {
    assert!(matches!(
        Config::from_lookup(lookup(&[("CONSENSUS_THRESHOLD", "1.5")])),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("AGENT_TIMEOUT_MS", "soon")])),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("ENABLED_AGENTS", "technical,astrology")])),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("MERGE_POLICY", "vote")])),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_no_agents_enabled() {
    assert_eq!(
        Config::from_lookup(lookup(&[("ENABLED_AGENTS", " , ")])).unwrap_err(),
        ConfigError::NoAgentsEnabled
    );
}

#[test]
fn test_max_confidence_below_threshold_rejected() {
    let result = Config::from_lookup(lookup(&[
        ("CONSENSUS_THRESHOLD", "0.9"),
        ("MAX_CONFIDENCE", "0.8"),
    ]));
    assert!(matches!(result, Err(ConfigError::InvalidValue { key, .. }) if key == "MAX_CONFIDENCE"));
}
