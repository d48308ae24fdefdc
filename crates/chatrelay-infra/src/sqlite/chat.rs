//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `chatrelay-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, writes on the
//! single-connection writer, reads on the reader pool.

use chatrelay_core::chat::repository::ChatRepository;
use chatrelay_types::chat::{Conversation, Message, Sender};
use chatrelay_types::error::RepositoryError;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: self.id,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct MessageRow {
    id: String,
    conversation_id: String,
    sender: String,
    text: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Message {
            id,
            conversation_id: self.conversation_id,
            sender,
            text: self.text,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lost or unreachable database connections are kept apart from failed statements.
fn storage_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            tracing::warn!(error = %err, "Database connection unavailable");
            RepositoryError::Connection
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

fn message_count(raw: i64) -> Result<u32, RepositoryError> {
    u32::try_from(raw)
        .map_err(|e| RepositoryError::Query(format!("message count {raw} out of range: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that text ordering in SQLite matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn ensure_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Conversation, RepositoryError> {
        let inserted = sqlx::query(
            "INSERT INTO conversations (id, created_at) VALUES (?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(conversation_id)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(storage_error)?;

        if inserted.rows_affected() > 0 {
            tracing::debug!(conversation_id, "Conversation created");
        }

        self.get_conversation(conversation_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT id, created_at FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(storage_error)?;

        match row {
            Some(row) => {
                let conversation_row = ConversationRow::from_row(&row)
                    .map_err(storage_error)?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        sender: Sender,
        text: &str,
    ) -> Result<Message, RepositoryError> {
        let message = Message {
            id: Uuid::now_v7(),
            conversation_id: conversation_id.to_string(),
            sender,
            text: text.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO messages (id, conversation_id, sender, text, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(&message.conversation_id)
        .bind(message.sender.to_string())
        .bind(&message.text)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(storage_error)?;

        Ok(message)
    }

    async fn recent_history(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, RepositoryError> {
        // Newest `limit` rows, returned oldest first. UUID v7 ids break timestamp ties.
        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT id, conversation_id, sender, text, created_at
                   FROM messages
                   WHERE conversation_id = ?
                   ORDER BY created_at DESC, id DESC
                   LIMIT ?
               )
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(conversation_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(storage_error)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = MessageRow::from_row(row).map_err(storage_error)?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn count_messages(&self, conversation_id: &str) -> Result<u32, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM messages WHERE conversation_id = ?")
            .bind(conversation_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(storage_error)?;

        let count: i64 = row.try_get("cnt").map_err(storage_error)?;

        message_count(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::{DatabasePool, database_url};

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn conversation_rows(pool: &DatabasePool, id: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn test_ensure_conversation_creates_once() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());

        let first = repo.ensure_conversation("abc").await.unwrap();
        let second = repo.ensure_conversation("abc").await.unwrap();

        assert_eq!(first.id, "abc");
        assert_eq!(first, second, "existing conversation must be left unmodified");
        assert_eq!(conversation_rows(&pool, "abc").await, 1);
    }

    #[tokio::test]
    async fn test_get_conversation_missing() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        assert!(repo.get_conversation("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_message_assigns_fresh_ids() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        repo.ensure_conversation("abc").await.unwrap();

        let a = repo.append_message("abc", Sender::User, "Hi").await.unwrap();
        let b = repo.append_message("abc", Sender::Ai, "Hello!").await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.conversation_id, "abc");
        assert_eq!(b.sender, Sender::Ai);
        assert!(a.created_at <= b.created_at);
        assert_eq!(repo.count_messages("abc").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_append_message_requires_conversation() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        let err = repo
            .append_message("ghost", Sender::User, "Hi")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }

    #[tokio::test]
    async fn test_recent_history_roundtrips_fields() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        repo.ensure_conversation("abc").await.unwrap();

        let stored = repo.append_message("abc", Sender::Ai, "Welcome!").await.unwrap();
        let history = repo.recent_history("abc", 10).await.unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, stored.id);
        assert_eq!(history[0].sender, Sender::Ai);
        assert_eq!(history[0].text, "Welcome!");
        assert_eq!(
            history[0].created_at.timestamp_micros(),
            stored.created_at.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_recent_history_is_latest_window_ascending() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        repo.ensure_conversation("abc").await.unwrap();

        for i in 0..12 {
            let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
            repo.append_message("abc", sender, &format!("m{i}")).await.unwrap();
        }

        let history = repo.recent_history("abc", 10).await.unwrap();
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();

        assert_eq!(
            texts,
            vec!["m2", "m3", "m4", "m5", "m6", "m7", "m8", "m9", "m10", "m11"]
        );
    }

    #[tokio::test]
    async fn test_recent_history_is_scoped_to_conversation() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);
        repo.ensure_conversation("a").await.unwrap();
        repo.ensure_conversation("b").await.unwrap();

        repo.append_message("a", Sender::User, "for a").await.unwrap();
        repo.append_message("b", Sender::User, "for b").await.unwrap();

        let history = repo.recent_history("a", 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "for a");
        assert!(repo.recent_history("c", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_is_connection_error() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool.clone());
        pool.close().await;

        let err = repo.count_messages("abc").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Connection));

        let err = repo
            .append_message("abc", Sender::User, "Hi")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Connection));
    }

    #[tokio::test]
    async fn test_count_messages_empty_conversation() {
        let pool = test_pool().await;
        let repo = SqliteChatRepository::new(pool);

        assert_eq!(repo.count_messages("nobody").await.unwrap(), 0);
    }

    #[test]
    fn test_message_count_rejects_out_of_range() {
        assert_eq!(message_count(7).unwrap(), 7);
        assert_eq!(message_count(i64::from(u32::MAX)).unwrap(), u32::MAX);
        assert!(matches!(
            message_count(i64::from(u32::MAX) + 1),
            Err(RepositoryError::Query(_))
        ));
        assert!(matches!(message_count(-1), Err(RepositoryError::Query(_))));
    }

    #[test]
    fn test_format_datetime_is_fixed_width() {
        let whole = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_datetime(&whole), "2026-01-01T00:00:00.000000Z");
        assert_eq!(parse_datetime(&format_datetime(&whole)).unwrap(), whole);
    }
}
