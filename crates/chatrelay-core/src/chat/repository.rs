//! ChatRepository trait definition.
//!
//! Create/read operations for conversations and their messages. Nothing here
//! updates or deletes: conversations and messages are append-only.

use chatrelay_types::chat::{Conversation, Message, Sender};
use chatrelay_types::error::RepositoryError;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in chatrelay-infra (e.g., `SqliteChatRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatRepository: Send + Sync {
    /// Create the conversation if it does not exist; an existing row is left untouched.
    fn ensure_conversation(
        &self,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id.
    fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// Insert a new message with a fresh id and the current timestamp.
    fn append_message(
        &self,
        conversation_id: &str,
        sender: Sender,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Message, RepositoryError>> + Send;

    /// The most recent `limit` messages of a conversation, oldest first.
    fn recent_history(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Total number of messages stored for a conversation.
    fn count_messages(
        &self,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
