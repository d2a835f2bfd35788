//! Error types for agent domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent name is outside the 3 to 100 character range.
    #[error("agent name must be between 3 and 100 characters: '{0}'")]
    InvalidAgentName(String),

    /// The description exceeds the 500-character limit.
    #[error("agent description exceeds 500 character limit ({0} characters)")]
    DescriptionTooLong(usize),

    /// The provider name is empty after trimming.
    #[error("agent provider must not be empty")]
    EmptyProvider,

    /// The model name is empty after trimming.
    #[error("agent model must not be empty")]
    EmptyModel,

    /// A generation setting is outside its accepted range.
    #[error("invalid agent config: {0}")]
    InvalidConfig(String),
}

/// Error returned while parsing agent roles, levels, or statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent {field}: {value}")]
pub struct ParseAgentProfileError {
    /// Name of the field that failed to parse.
    pub field: &'static str,
    /// Rejected raw value.
    pub value: String,
}

impl ParseAgentProfileError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}
