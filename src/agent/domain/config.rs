//! Generation settings passed to an agent's model provider.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};

/// Sampling and length settings for an agent's model calls.
///
/// Missing fields deserialise to the defaults: temperature `0.7`, max tokens
/// `2000`, top-p `1.0`, and zero penalties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Sampling temperature in `0.0..=2.0`.
    pub temperature: f64,
    /// Upper bound on generated tokens per call.
    pub max_tokens: u32,
    /// Nucleus sampling mass in `0.0..=1.0`.
    pub top_p: f64,
    /// Frequency penalty in `-2.0..=2.0`.
    pub frequency_penalty: f64,
    /// Presence penalty in `-2.0..=2.0`.
    pub presence_penalty: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl AgentConfig {
    /// Checks every setting against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::InvalidConfig`] naming the first setting
    /// that is out of range.
    pub fn validate(&self) -> Result<(), AgentDomainError> {
        let checks = [
            ("temperature", (0.0..=2.0).contains(&self.temperature)),
            ("top_p", (0.0..=1.0).contains(&self.top_p)),
            (
                "frequency_penalty",
                (-2.0..=2.0).contains(&self.frequency_penalty),
            ),
            (
                "presence_penalty",
                (-2.0..=2.0).contains(&self.presence_penalty),
            ),
            ("max_tokens", self.max_tokens > 0),
        ];
        checks
            .iter()
            .find(|(_, in_range)| !in_range)
            .map_or(Ok(()), |(field, _)| {
                Err(AgentDomainError::InvalidConfig(format!(
                    "{field} is out of range"
                )))
            })
    }
}
