//! Relay configuration types.
//!
//! `RelayConfig` represents `config.toml` in the data directory. Every field
//! has a default, so an empty or missing file yields a working relay that
//! talks to Groq's `llama-3.1-8b-instant`.

use serde::{Deserialize, Serialize};

/// System instruction sent ahead of every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful support agent for a small ecommerce store.

Store info:
- Shipping: Worldwide. USA delivery takes 5–7 days.
- Returns: 7-day no-questions-asked return.
- Refunds: Processed in 5 business days.
- Support hours: Mon–Fri, 10am–6pm IST.
";

/// Reply returned (and stored) when the completion provider fails.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Top-level configuration for the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Number of most recent messages loaded as model context.
    #[serde(default = "default_history_window")]
    pub history_window: u32,

    #[serde(default)]
    pub provider: ProviderSettings,
}

fn default_history_window() -> u32 {
    10
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            provider: ProviderSettings::default(),
        }
    }
}

/// Completion provider settings (`[provider]` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Human-readable provider name used in logs and spans.
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Output cap for each completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_provider_name() -> String {
    "groq".to_string()
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            system_prompt: default_system_prompt(),
        }
    }
}
