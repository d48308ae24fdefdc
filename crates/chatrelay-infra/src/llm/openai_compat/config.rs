//! Connection settings for OpenAI-compatible providers.
//!
//! Everything comes from the `[provider]` table. Its defaults point at Groq;
//! any other endpoint speaking the chat completions protocol works by
//! overriding `name` and `base_url`.

use chatrelay_types::config::ProviderSettings;
use secrecy::SecretString;

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Provider name reported in logs and spans (e.g., "groq").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.groq.com/openai/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model, used when a request leaves `model` empty.
    pub model: String,
}

/// Build a configuration from the `[provider]` table of `config.toml`.
pub fn from_settings(settings: &ProviderSettings, api_key: SecretString) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: settings.name.clone(),
        base_url: settings.base_url.trim_end_matches('/').to_string(),
        api_key,
        model: settings.model.clone(),
    }
}
