use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentSpecialty {
    Technical,
    Discovery,
    Macro,
}

impl AgentSpecialty {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentSpecialty::Technical => "technical",
            AgentSpecialty::Discovery => "discovery",
            AgentSpecialty::Macro => "macro",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "technical" => Some(AgentSpecialty::Technical),
            "discovery" => Some(AgentSpecialty::Discovery),
            "macro" => Some(AgentSpecialty::Macro),
            _ => None,
        }
    }
}

impl fmt::Display for AgentSpecialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostics view of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub name: String,
    pub specialty: AgentSpecialty,
    pub initialized: bool,
    /// `None` until the minimum number of outcomes has been recorded
    pub success_rate: Option<f64>,
    pub call_count: u64,
    pub outcomes_recorded: u64,
    pub pending_calls: u32,
    /// Calls whose analysis returned an error
    pub failed_calls: u64,
}
