//! Scriptable agents for orchestrator scenarios

#![allow(dead_code)]

use async_trait::async_trait;
use embassy_signals::agents::{Agent, AgentCore, AgentError};
use embassy_signals::indicators::IndicatorError;
use embassy_signals::models::{
    AgentAnalysis, AgentSignal, AgentSpecialty, MacroVerdict, MarketCondition, MarketSnapshot,
    Sentiment, SignalAction,
};
use embassy_signals::services::StaticCredentialStore;
use std::time::Duration;

pub const STUB_KEY: &str = "STUB_API_KEY";

pub fn credentials() -> StaticCredentialStore {
    StaticCredentialStore::new().with(STUB_KEY, "stub")
}

#[derive(Debug, Clone)]
pub enum Behavior {
    Signals(Vec<AgentSignal>),
    Verdict(MacroVerdict),
    Nothing,
    Fail,
    Sleep(Duration),
    Panic,
}

pub struct StubAgent {
    core: AgentCore,
    key: String,
    behavior: Behavior,
}

impl StubAgent {
    pub fn new(name: &str, specialty: AgentSpecialty, behavior: Behavior) -> Self {
        Self {
            core: AgentCore::new(name, specialty),
            key: STUB_KEY.to_string(),
            behavior,
        }
    }

    pub fn signals(name: &str, signals: Vec<AgentSignal>) -> Self {
        Self::new(name, AgentSpecialty::Technical, Behavior::Signals(signals))
    }

    pub fn buy(name: &str, token: &str, confidence: f64) -> Self {
        Self::signals(name, vec![AgentSignal::new(token, SignalAction::Buy, confidence)])
    }

    pub fn verdict(name: &str, sentiment: Sentiment, confidence: f64) -> Self {
        Self::new(
            name,
            AgentSpecialty::Macro,
            Behavior::Verdict(MacroVerdict {
                sentiment,
                condition: MarketCondition::Stable,
                confidence,
                recommended_assets: vec!["SOL".to_string()],
                rationale: "stub".to_string(),
            }),
        )
    }

    pub fn requiring(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn boxed(self) -> Box<dyn Agent> {
        Box::new(self)
    }
}

#[async_trait]
impl Agent for StubAgent {
    fn core(&self) -> &AgentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    fn credential_key(&self) -> &str {
        &self.key
    }

    async fn evaluate(
        &mut self,
        _snapshot: &MarketSnapshot,
    ) -> Result<Option<AgentAnalysis>, AgentError> {
        match &self.behavior {
            Behavior::Signals(signals) => Ok(Some(AgentAnalysis::Signals {
                signals: signals.clone(),
            })),
            Behavior::Verdict(verdict) => Ok(Some(AgentAnalysis::Macro {
                verdict: verdict.clone(),
            })),
            Behavior::Nothing => Ok(None),
            Behavior::Fail => Err(IndicatorError::invalid("stub", "scripted failure").into()),
            Behavior::Sleep(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(Some(AgentAnalysis::Signals { signals: vec![] }))
            }
            Behavior::Panic => panic!("stub agent exploded"),
        }
    }
}
