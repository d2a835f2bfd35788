//! Validated agent name type.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_NAME_LENGTH: usize = 3;
/// Maximum length for an agent name, matching the `VARCHAR(100)` column.
const MAX_NAME_LENGTH: usize = 100;

/// Human-readable agent name, trimmed and 3 to 100 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidAgentName`] when the trimmed value
    /// is shorter than 3 or longer than 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
            return Err(AgentDomainError::InvalidAgentName(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the agent name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
