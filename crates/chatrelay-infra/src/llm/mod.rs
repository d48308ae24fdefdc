//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `chatrelay-core`, plus [`create_provider`] which builds
//! the configured provider behind a [`BoxLlmProvider`].
//!
//! [`LlmProvider`]: chatrelay_core::llm::provider::LlmProvider

pub mod openai_compat;

use secrecy::SecretString;

use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_types::config::ProviderSettings;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] from the `[provider]` settings.
///
/// An empty key is accepted: the remote endpoint rejects the call and the
/// relay answers with its fallback reply instead of refusing to start.
pub fn create_provider(settings: &ProviderSettings, api_key: SecretString) -> BoxLlmProvider {
    BoxLlmProvider::new(OpenAiCompatibleProvider::from_settings(settings, api_key))
}
