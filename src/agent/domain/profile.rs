//! Agent role and seniority classification.

use super::ParseAgentProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engineering role an agent fills within its project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Server-side development.
    BackendDeveloper,
    /// Client-side development.
    FrontendDeveloper,
    /// End-to-end development.
    FullstackDeveloper,
    /// Testing and quality assurance.
    Tester,
    /// Infrastructure and delivery.
    Devops,
    /// Planning and coordination.
    ProjectManager,
}

impl AgentRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BackendDeveloper => "backend_developer",
            Self::FrontendDeveloper => "frontend_developer",
            Self::FullstackDeveloper => "fullstack_developer",
            Self::Tester => "tester",
            Self::Devops => "devops",
            Self::ProjectManager => "project_manager",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentRole {
    type Error = ParseAgentProfileError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backend_developer" => Ok(Self::BackendDeveloper),
            "frontend_developer" => Ok(Self::FrontendDeveloper),
            "fullstack_developer" => Ok(Self::FullstackDeveloper),
            "tester" => Ok(Self::Tester),
            "devops" => Ok(Self::Devops),
            "project_manager" => Ok(Self::ProjectManager),
            _ => Err(ParseAgentProfileError::new("role", value)),
        }
    }
}

/// Seniority level of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLevel {
    /// Junior level.
    Junior,
    /// Mid level.
    Mid,
    /// Senior level.
    Senior,
}

impl AgentLevel {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
        }
    }
}

impl fmt::Display for AgentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentLevel {
    type Error = ParseAgentProfileError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "junior" => Ok(Self::Junior),
            "mid" => Ok(Self::Mid),
            "senior" => Ok(Self::Senior),
            _ => Err(ParseAgentProfileError::new("level", value)),
        }
    }
}
