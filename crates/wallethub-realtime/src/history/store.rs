//! Storage backends for chat messages.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use wallethub_core::result::AppResult;
use wallethub_database::repositories::ChatMessageRepository;
use wallethub_entity::chat::ChatMessage;

/// Where the realtime engine persists chat messages and reads history from.
#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    /// Persist one message and return the stored record.
    async fn save(
        &self,
        username: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<ChatMessage>;

    /// Fetch at most `limit` of the most recent messages, oldest first.
    async fn recent(&self, limit: usize) -> AppResult<Vec<ChatMessage>>;
}

#[async_trait]
impl MessageStore for ChatMessageRepository {
    async fn save(
        &self,
        username: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<ChatMessage> {
        self.create(username, message, timestamp).await
    }

    async fn recent(&self, limit: usize) -> AppResult<Vec<ChatMessage>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.find_recent(limit).await
    }
}

/// In-memory store for single-process runs and tests.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: RwLock<Vec<ChatMessage>>,
    next_id: AtomicI64,
}

impl MemoryMessageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages
    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    /// Returns `true` when nothing has been stored
    pub async fn is_empty(&self) -> bool {
        self.messages.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn save(
        &self,
        username: &str,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<ChatMessage> {
        let record = ChatMessage {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            username: username.to_string(),
            message: message.to_string(),
            timestamp,
            created_at: Utc::now(),
        };
        self.messages.write().await.push(record.clone());
        Ok(record)
    }

    async fn recent(&self, limit: usize) -> AppResult<Vec<ChatMessage>> {
        let mut all = self.messages.read().await.clone();
        all.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        let skip = all.len().saturating_sub(limit);
        Ok(all.split_off(skip))
    }
}
