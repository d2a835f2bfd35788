//! Provider and model descriptions.

use serde::{Deserialize, Serialize};

/// An LLM provider reachable by agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    /// Lookup key, such as `openai`.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// API root URL.
    pub base_url: String,
    /// Whether calls need an API key.
    #[serde(default = "default_requires_api_key")]
    pub requires_api_key: bool,
    /// Models offered by the provider.
    #[serde(default)]
    pub models: Vec<ProviderModel>,
}

/// A model served by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderModel {
    /// Model identifier sent to the provider.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Whether responses can be streamed.
    #[serde(default)]
    pub supports_streaming: bool,
    /// Whether image input is accepted.
    #[serde(default)]
    pub supports_vision: bool,
    /// Input price in USD per million tokens.
    #[serde(default)]
    pub input_price_per_m_token: f64,
    /// Output price in USD per million tokens.
    #[serde(default)]
    pub output_price_per_m_token: f64,
}

const fn default_requires_api_key() -> bool {
    true
}

impl Provider {
    /// Finds one of the provider's models by identifier.
    #[must_use]
    pub fn model(&self, id: &str) -> Option<&ProviderModel> {
        self.models.iter().find(|model| model.id == id)
    }
}

impl ProviderModel {
    pub(super) fn builtin(
        id: &str,
        name: &str,
        max_tokens: u32,
        supports_vision: bool,
        prices: (f64, f64),
    ) -> Self {
        let (input, output) = prices;
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
            max_tokens,
            supports_streaming: true,
            supports_vision,
            input_price_per_m_token: input,
            output_price_per_m_token: output,
        }
    }
}
