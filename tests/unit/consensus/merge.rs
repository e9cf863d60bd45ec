//! Unit tests for confidence adjustment, merging and ranking

use embassy_signals::config::{ConsensusConfig, MergePolicy};
use embassy_signals::consensus::{
    apply_adjustments, macro_adjustment, merge_by_token, rank_and_filter, Candidate,
};
use embassy_signals::models::{
    AgentSignal, MacroVerdict, MarketCondition, RankedSignal, Sentiment, SignalAction,
};

fn candidate(agent: &str, token: &str, action: SignalAction, confidence: f64) -> Candidate {
    Candidate {
        agent: agent.to_string(),
        signal: AgentSignal::new(token, action, confidence).with_rationale(format!("{} says so", agent)),
        history_adjustment: 0.0,
    }
}

fn verdict(sentiment: Sentiment, confidence: f64) -> MacroVerdict {
    MacroVerdict {
        sentiment,
        condition: MarketCondition::Stable,
        confidence,
        recommended_assets: vec![],
        rationale: String::new(),
    }
}

fn ranked(token: &str, confidence: f64) -> RankedSignal {
    RankedSignal {
        signal: AgentSignal::new(token, SignalAction::Buy, confidence),
        agent: "a".to_string(),
        original_confidence: confidence,
        history_adjustment: 0.0,
        macro_adjustment: 0.0,
    }
}

#[test]
fn test_macro_adjustment_direction() {
    let bullish = verdict(Sentiment::Bullish, 0.8);
    assert!((macro_adjustment(&bullish, SignalAction::Buy, 0.2) - 0.16).abs() < 1e-12);
    assert!((macro_adjustment(&bullish, SignalAction::Sell, 0.2) + 0.16).abs() < 1e-12);
    assert_eq!(macro_adjustment(&bullish, SignalAction::Monitor, 0.2), 0.0);

    let bearish = verdict(Sentiment::Bearish, 0.5);
    assert!((macro_adjustment(&bearish, SignalAction::Sell, 0.2) - 0.1).abs() < 1e-12);
}

#[test]
fn test_adjustments_are_capped() {
    let config = ConsensusConfig::default();
    let mut strong = candidate("a", "SOL", SignalAction::Buy, 0.9);
    strong.history_adjustment = 0.2;
    let weak = candidate("b", "ETH", SignalAction::Sell, 0.1);

    let adjusted = apply_adjustments(
        vec![strong, weak],
        Some(&verdict(Sentiment::Bullish, 1.0)),
        &config,
    );
    assert_eq!(adjusted[0].confidence(), 0.95);
    assert_eq!(adjusted[0].original_confidence, 0.9);
    assert_eq!(adjusted[0].history_adjustment, 0.2);
    assert_eq!(adjusted[1].confidence(), 0.0);
    assert!((adjusted[1].macro_adjustment + 0.2).abs() < 1e-12);
}

#[test]
fn test_adjustments_without_verdict() {
    let config = ConsensusConfig::default();
    let adjusted = apply_adjustments(vec![candidate("a", "SOL", SignalAction::Buy, 0.99)], None, &config);
    assert_eq!(adjusted[0].macro_adjustment, 0.0);
    assert_eq!(adjusted[0].confidence(), 0.95);
}

#[test]
fn test_keep_highest_per_token() {
    let config = ConsensusConfig::default();
    let adjusted = apply_adjustments(
        vec![
            candidate("a", "SOL", SignalAction::Buy, 0.72),
            candidate("b", "SOL", SignalAction::Buy, 0.68),
            candidate("c", "ETH", SignalAction::Sell, 0.75),
        ],
        Some(&verdict(Sentiment::Bullish, 0.8)),
        &config,
    );
    let merged = merge_by_token(adjusted, MergePolicy::KeepHighest);
    assert_eq!(merged.len(), 2);
    let sol = merged.iter().find(|s| s.signal.token_id == "SOL").unwrap();
    assert_eq!(sol.agent, "a");
    assert!((sol.confidence() - 0.88).abs() < 1e-9);
}

#[test]
fn test_keep_highest_tie_keeps_first() {
    let merged = merge_by_token(
        vec![ranked("SOL", 0.8), {
            let mut other = ranked("SOL", 0.8);
            other.agent = "b".to_string();
            other
        }],
        MergePolicy::KeepHighest,
    );
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].agent, "a");
}

#[test]
fn test_average_policy() {
    let config = ConsensusConfig::default();
    let adjusted = apply_adjustments(
        vec![
            candidate("a", "SOL", SignalAction::Buy, 0.8),
            candidate("b", "SOL", SignalAction::Buy, 0.7),
            candidate("c", "SOL", SignalAction::Sell, 0.72),
        ],
        None,
        &config,
    );
    let merged = merge_by_token(adjusted, MergePolicy::Average);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].signal.action, SignalAction::Buy);
    assert_eq!(merged[0].agent, "a+b");
    assert!((merged[0].confidence() - 0.75).abs() < 1e-9);
    assert!(merged[0].signal.rationale.contains("b says so"));
}

#[test]
fn test_keep_all_policy() {
    let merged = merge_by_token(vec![ranked("SOL", 0.8), ranked("SOL", 0.7)], MergePolicy::KeepAll);
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_rank_and_filter() {
    let signals = vec![
        ranked("A", 0.71),
        ranked("B", 0.69),
        ranked("C", 0.9),
        ranked("D", 0.70),
        ranked("E", 0.8),
    ];
    let ranked = rank_and_filter(signals, 0.70);
    let tokens: Vec<&str> = ranked.iter().map(|s| s.signal.token_id.as_str()).collect();
    assert_eq!(tokens, vec!["C", "E", "A", "D"]);
    assert!(ranked.windows(2).all(|w| w[0].confidence() >= w[1].confidence()));
}
