//! Agent runtime status.

use super::ParseAgentProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime status reported for an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Registered and waiting for work.
    #[default]
    Idle,
    /// Working on an assignment.
    Active,
    /// Saturated with work.
    Busy,
    /// Last run failed.
    Error,
    /// Switched off by an operator.
    Disabled,
    /// Starting up.
    Initializing,
}

impl AgentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Busy => "busy",
            Self::Error => "error",
            Self::Disabled => "disabled",
            Self::Initializing => "initializing",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentStatus {
    type Error = ParseAgentProfileError;

    fn try_from(value: &str) -> Result<Self, ParseAgentProfileError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "idle" => Ok(Self::Idle),
            "active" => Ok(Self::Active),
            "busy" => Ok(Self::Busy),
            "error" => Ok(Self::Error),
            "disabled" => Ok(Self::Disabled),
            "initializing" => Ok(Self::Initializing),
            _ => Err(ParseAgentProfileError::new("status", value)),
        }
    }
}
