//! Reply generation on top of an [`LlmProvider`].
//!
//! `ReplyGenerator` assembles the completion request (system instruction,
//! tagged history, current user turn) and absorbs every provider failure into
//! [`FALLBACK_REPLY`]. Callers always get a string back.

use tracing::{Instrument, debug, error, info_span, warn};

use chatrelay_types::chat::{HistoryEntry, Sender};
use chatrelay_types::config::{FALLBACK_REPLY, ProviderSettings};
use chatrelay_types::llm::{CompletionRequest, Message, MessageRole};

use super::provider::LlmProvider;

/// Fixed request parameters for every reply.
#[derive(Debug, Clone)]
pub struct ReplySettings {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
}

impl From<&ProviderSettings> for ReplySettings {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            model: settings.model.clone(),
            system_prompt: settings.system_prompt.clone(),
            max_tokens: settings.max_tokens,
        }
    }
}

/// Generates assistant replies; never returns an error.
pub struct ReplyGenerator<P: LlmProvider> {
    provider: P,
    settings: ReplySettings,
}

impl<P: LlmProvider> ReplyGenerator<P> {
    pub fn new(provider: P, settings: ReplySettings) -> Self {
        Self { provider, settings }
    }

    /// Access the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn settings(&self) -> &ReplySettings {
        &self.settings
    }

    /// Build the non-streaming request for one turn.
    ///
    /// Roles come from each entry's sender tag; text is forwarded verbatim.
    pub fn build_request(&self, history: &[HistoryEntry], user_message: &str) -> CompletionRequest {
        let mut messages: Vec<Message> = history
            .iter()
            .map(|entry| Message {
                role: match entry.sender {
                    Sender::Ai => MessageRole::Assistant,
                    Sender::User => MessageRole::User,
                },
                content: entry.text.clone(),
            })
            .collect();

        messages.push(Message {
            role: MessageRole::User,
            content: user_message.to_string(),
        });

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: Some(self.settings.system_prompt.clone()),
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Ask the provider for a reply to `user_message` given `history`.
    ///
    /// Provider errors are logged with their kind and replaced by
    /// [`FALLBACK_REPLY`]. An empty completion is returned as-is.
    pub async fn generate_reply(&self, history: &[HistoryEntry], user_message: &str) -> String {
        let request = self.build_request(history, user_message);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.provider.name = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            history_len = history.len(),
        );

        match self.provider.complete(&request).instrument(span).await {
            Ok(response) => {
                if response.content.is_empty() {
                    warn!(
                        provider = self.provider.name(),
                        response_id = %response.id,
                        "Provider returned an empty completion"
                    );
                } else {
                    debug!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        stop_reason = %response.stop_reason,
                        "Completion received"
                    );
                }
                response.content
            }
            Err(err) => {
                error!(
                    provider = self.provider.name(),
                    error_kind = err.kind(),
                    error = %err,
                    "Completion failed, returning fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
