//! Read-only provider lookup.

use super::{Provider, ProviderModel};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors returned by provider lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// No provider has the requested name.
    #[error("provider not found: {0}")]
    NotFound(String),
    /// The configured catalog lists a provider twice.
    #[error("provider {0} is configured more than once")]
    Duplicate(String),
    /// A configured provider has an empty name.
    #[error("provider name must not be empty")]
    EmptyName,
}

/// Result type for provider lookups.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Immutable list of providers, looked up by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCatalog {
    providers: Vec<Provider>,
}

impl ProviderCatalog {
    /// Builds a catalog from configured providers.
    ///
    /// Names are compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::EmptyName`] or [`ProviderError::Duplicate`]
    /// when the list is malformed.
    pub fn new(providers: Vec<Provider>) -> ProviderResult<Self> {
        let mut seen = BTreeSet::new();
        for provider in &providers {
            let key = normalise(&provider.name);
            if key.is_empty() {
                return Err(ProviderError::EmptyName);
            }
            if !seen.insert(key) {
                return Err(ProviderError::Duplicate(provider.name.clone()));
            }
        }
        Ok(Self { providers })
    }

    /// Builds the configured catalog, or the built-in one when nothing is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the configured list is malformed.
    pub fn from_config(providers: &[Provider]) -> ProviderResult<Self> {
        if providers.is_empty() {
            return Ok(Self::builtin());
        }
        Self::new(providers.to_vec())
    }

    /// Returns the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                Provider {
                    name: "openai".to_owned(),
                    display_name: "OpenAI".to_owned(),
                    base_url: "https://api.openai.com/v1".to_owned(),
                    requires_api_key: true,
                    models: vec![
                        ProviderModel::builtin("gpt-4o", "GPT-4o", 16_384, true, (2.5, 10.0)),
                        ProviderModel::builtin("gpt-4o-mini", "GPT-4o mini", 16_384, true, (0.15, 0.6)),
                    ],
                },
                Provider {
                    name: "anthropic".to_owned(),
                    display_name: "Anthropic".to_owned(),
                    base_url: "https://api.anthropic.com/v1".to_owned(),
                    requires_api_key: true,
                    models: vec![
                        ProviderModel::builtin(
                            "claude-sonnet-4-5",
                            "Claude Sonnet 4.5",
                            64_000,
                            true,
                            (3.0, 15.0),
                        ),
                        ProviderModel::builtin(
                            "claude-haiku-4-5",
                            "Claude Haiku 4.5",
                            64_000,
                            true,
                            (1.0, 5.0),
                        ),
                    ],
                },
                Provider {
                    name: "ollama".to_owned(),
                    display_name: "Ollama (local)".to_owned(),
                    base_url: "http://localhost:11434".to_owned(),
                    requires_api_key: false,
                    models: vec![ProviderModel::builtin(
                        "llama3.1",
                        "Llama 3.1",
                        8_192,
                        false,
                        (0.0, 0.0),
                    )],
                },
            ],
        }
    }

    /// Returns every provider in configuration order.
    #[must_use]
    pub fn list(&self) -> &[Provider] {
        &self.providers
    }

    /// Finds a provider by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when no provider matches.
    pub fn find(&self, name: &str) -> ProviderResult<&Provider> {
        let key = normalise(name);
        self.providers
            .iter()
            .find(|provider| normalise(&provider.name) == key)
            .ok_or_else(|| ProviderError::NotFound(name.to_owned()))
    }

    /// Returns the models of a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotFound`] when no provider matches.
    pub fn models(&self, name: &str) -> ProviderResult<&[ProviderModel]> {
        Ok(&self.find(name)?.models)
    }
}

fn normalise(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
