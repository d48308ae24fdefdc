//! Chat service orchestrating one request/response turn.
//!
//! ChatService validates the inbound message, upserts the conversation,
//! stores the user turn, loads the history window, asks the reply generator
//! for an answer and stores that answer. Storage errors propagate; provider
//! errors never reach this layer (see [`ReplyGenerator`]).

use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use chatrelay_types::chat::{ChatReply, HistoryEntry, Sender};
use chatrelay_types::error::ChatError;

use crate::chat::repository::ChatRepository;
use crate::llm::provider::LlmProvider;
use crate::llm::reply::ReplyGenerator;

/// Validation message for blank input.
pub const EMPTY_MESSAGE_ERROR: &str = "Message cannot be empty";

/// Orchestrates a single chat turn.
///
/// Generic over `ChatRepository` and `LlmProvider` to maintain clean
/// architecture (chatrelay-core never depends on chatrelay-infra).
pub struct ChatService<C: ChatRepository, P: LlmProvider> {
    chat_repo: C,
    replies: ReplyGenerator<P>,
    history_window: u32,
}

impl<C: ChatRepository, P: LlmProvider> ChatService<C, P> {
    /// Create a new chat service.
    ///
    /// `history_window` is the number of most recent messages (including the
    /// turn being handled) loaded as model context.
    pub fn new(chat_repo: C, replies: ReplyGenerator<P>, history_window: u32) -> Self {
        Self {
            chat_repo,
            replies,
            history_window,
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    /// Access the reply generator.
    pub fn replies(&self) -> &ReplyGenerator<P> {
        &self.replies
    }

    /// Handle one inbound message.
    ///
    /// A blank `message` is rejected before anything is written. Without a
    /// `session_id` a fresh UUID v7 becomes the conversation id.
    pub async fn handle(
        &self,
        message: &str,
        session_id: Option<String>,
    ) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation(EMPTY_MESSAGE_ERROR.to_string()));
        }

        let conversation_id = session_id.unwrap_or_else(|| Uuid::now_v7().to_string());
        let span = info_span!("chat.handle", session_id = %conversation_id);

        self.run_turn(conversation_id, message).instrument(span).await
    }

    async fn run_turn(&self, conversation_id: String, message: &str) -> Result<ChatReply, ChatError> {
        self.chat_repo.ensure_conversation(&conversation_id).await?;

        let user_message = self
            .chat_repo
            .append_message(&conversation_id, Sender::User, message)
            .await?;

        let window = self
            .chat_repo
            .recent_history(&conversation_id, self.history_window)
            .await?;

        // The current turn is sent separately, so drop it from the history.
        let history: Vec<HistoryEntry> = window
            .iter()
            .filter(|m| m.id != user_message.id)
            .map(HistoryEntry::from)
            .collect();

        debug!(
            history = ?history.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Loaded conversation history"
        );

        let reply = self.replies.generate_reply(&history, message).await;

        let stored = self
            .chat_repo
            .append_message(&conversation_id, Sender::Ai, &reply)
            .await?;

        info!(
            message_id = %stored.id,
            history_len = history.len(),
            reply_len = reply.len(),
            "Chat turn completed"
        );

        Ok(ChatReply {
            reply,
            session_id: conversation_id,
        })
    }
}
