//! Confidence adjustment, per-token merging and ranking of agent signals

use crate::common::math;
use crate::config::{ConsensusConfig, MergePolicy};
use crate::models::consensus::RankedSignal;
use crate::models::signal::{AgentSignal, MacroVerdict, SignalAction};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A per-token signal as collected from one agent in a round
#[derive(Debug, Clone)]
pub struct Candidate {
    pub agent: String,
    pub signal: AgentSignal,
    /// The agent's track-record adjustment at collection time
    pub history_adjustment: f64,
}

/// Macro-alignment term for one action: `+confidence * weight` when the
/// macro sentiment agrees, the negation when it disagrees, 0 for monitor.
pub fn macro_adjustment(verdict: &MacroVerdict, action: SignalAction, weight: f64) -> f64 {
    verdict.sentiment.alignment(action) * verdict.confidence * weight
}

/// Apply history and macro adjustments, capping at `max_confidence`
pub fn apply_adjustments(
    candidates: Vec<Candidate>,
    verdict: Option<&MacroVerdict>,
    config: &ConsensusConfig,
) -> Vec<RankedSignal> {
    candidates
        .into_iter()
        .map(|candidate| {
            let Candidate {
                agent,
                mut signal,
                history_adjustment,
            } = candidate;
            let original_confidence = signal.confidence;
            let macro_adjustment = verdict
                .map(|v| macro_adjustment(v, signal.action, config.macro_weight))
                .unwrap_or(0.0);
            signal.confidence = math::bounded(
                original_confidence + history_adjustment + macro_adjustment,
                0.0,
                config.max_confidence,
            );
            RankedSignal {
                signal,
                agent,
                original_confidence,
                history_adjustment,
                macro_adjustment,
            }
        })
        .collect()
}

/// Reconcile signals that name the same token
pub fn merge_by_token(signals: Vec<RankedSignal>, policy: MergePolicy) -> Vec<RankedSignal> {
    match policy {
        MergePolicy::KeepAll => signals,
        MergePolicy::KeepHighest => keep_highest(signals),
        MergePolicy::Average => average(signals),
    }
}

fn keep_highest(signals: Vec<RankedSignal>) -> Vec<RankedSignal> {
    let mut best: HashMap<String, usize> = HashMap::new();
    for (i, signal) in signals.iter().enumerate() {
        let token = &signal.signal.token_id;
        match best.get(token) {
            // Ties keep the earlier signal
            Some(&j) if signals[j].confidence() >= signal.confidence() => {}
            _ => {
                best.insert(token.clone(), i);
            }
        }
    }
    signals
        .into_iter()
        .enumerate()
        .filter(|(i, s)| best.get(&s.signal.token_id) == Some(i))
        .map(|(_, s)| s)
        .collect()
}

fn average(signals: Vec<RankedSignal>) -> Vec<RankedSignal> {
    // (token, action) groups in first-seen order
    let mut order: Vec<(String, SignalAction)> = Vec::new();
    let mut groups: HashMap<(String, SignalAction), Vec<RankedSignal>> = HashMap::new();
    for signal in signals {
        let key = (signal.signal.token_id.clone(), signal.signal.action);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(signal);
    }

    let averaged: Vec<RankedSignal> = order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .filter_map(|group| {
            let n = group.len() as f64;
            let mean = |f: fn(&RankedSignal) -> f64| group.iter().map(f).sum::<f64>() / n;
            let confidence = mean(|s| s.signal.confidence);
            let original_confidence = mean(|s| s.original_confidence);
            let history_adjustment = mean(|s| s.history_adjustment);
            let macro_adjustment = mean(|s| s.macro_adjustment);
            let agents: Vec<&str> = group.iter().map(|s| s.agent.as_str()).collect();
            let agent = agents.join("+");
            let rationale = group
                .iter()
                .map(|s| s.signal.rationale.as_str())
                .collect::<Vec<_>>()
                .join(" | ");

            let mut representative = group.into_iter().max_by(|a, b| {
                a.confidence()
                    .partial_cmp(&b.confidence())
                    .unwrap_or(Ordering::Equal)
            })?;
            representative.signal.confidence = confidence;
            representative.signal.rationale = rationale;
            representative.agent = agent;
            representative.original_confidence = original_confidence;
            representative.history_adjustment = history_adjustment;
            representative.macro_adjustment = macro_adjustment;
            Some(representative)
        })
        .collect();

    // Opposing actions on one token: the stronger side wins
    keep_highest(averaged)
}

/// Stable sort by descending confidence, then drop everything below `threshold`
pub fn rank_and_filter(mut signals: Vec<RankedSignal>, threshold: f64) -> Vec<RankedSignal> {
    signals.sort_by(|a, b| {
        b.confidence()
            .partial_cmp(&a.confidence())
            .unwrap_or(Ordering::Equal)
    });
    signals.retain(|s| s.confidence() >= threshold);
    signals
}
