//! In-memory test doubles shared by this crate's unit tests.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use chatrelay_types::chat::{Conversation, Message, Sender};
use chatrelay_types::error::RepositoryError;
use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};

use crate::chat::repository::ChatRepository;
use crate::llm::provider::LlmProvider;

pub(crate) struct MockProvider {
    result: Result<String, LlmError>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockProvider {
    pub(crate) fn replying(content: &str) -> Self {
        Self {
            result: Ok(content.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(err: LlmError) -> Self {
        Self {
            result: Err(err),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let content = self.result.clone()?;
        Ok(CompletionResponse {
            id: "resp-mock".to_string(),
            content,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }
}

#[derive(Default)]
pub(crate) struct InMemoryChatRepository {
    pub(crate) conversations: Mutex<Vec<Conversation>>,
    pub(crate) messages: Mutex<Vec<Message>>,
    pub(crate) fail_appends: bool,
}

impl InMemoryChatRepository {
    pub(crate) fn failing_appends() -> Self {
        Self {
            fail_appends: true,
            ..Default::default()
        }
    }

    pub(crate) fn conversation_count(&self) -> usize {
        self.conversations.lock().unwrap().len()
    }

    pub(crate) fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl ChatRepository for InMemoryChatRepository {
    async fn ensure_conversation(&self, conversation_id: &str) -> Result<Conversation, RepositoryError> {
        let mut conversations = self.conversations.lock().unwrap();
        if let Some(existing) = conversations.iter().find(|c| c.id == conversation_id) {
            return Ok(existing.clone());
        }
        let conversation = Conversation {
            id: conversation_id.to_string(),
            created_at: Utc::now(),
        };
        conversations.push(conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<Option<Conversation>, RepositoryError> {
        let conversations = self.conversations.lock().unwrap();
        Ok(conversations.iter().find(|c| c.id == conversation_id).cloned())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        sender: Sender,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        if self.fail_appends {
            return Err(RepositoryError::Query("disk I/O error".to_string()));
        }
        let message = Message {
            id: Uuid::now_v7(),
            conversation_id: conversation_id.to_string(),
            sender,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn recent_history(&self, conversation_id: &str, limit: u32) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.lock().unwrap();
        let thread: Vec<Message> = messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        let skip = thread.len().saturating_sub(limit as usize);
        Ok(thread.into_iter().skip(skip).collect())
    }

    async fn count_messages(&self, conversation_id: &str) -> Result<u32, RepositoryError> {
        let messages = self.messages.lock().unwrap();
        Ok(messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .count() as u32)
    }
}
