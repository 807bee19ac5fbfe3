//! Recent-history replay for newly connected peers.

use std::sync::Arc;

use wallethub_core::result::AppResult;
use wallethub_entity::chat::ChatMessage;

use crate::message::serializer::encode_chat;
use crate::message::types::ChatFrame;

use super::store::MessageStore;

/// Reads the most recent chat messages, capped and ordered oldest-first.
#[derive(Clone)]
pub struct HistoryReplay {
    store: Arc<dyn MessageStore>,
    limit: usize,
}

impl std::fmt::Debug for HistoryReplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryReplay")
            .field("limit", &self.limit)
            .finish()
    }
}

impl HistoryReplay {
    pub fn new(store: Arc<dyn MessageStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Recent messages, ascending by timestamp, never more than the cap.
    ///
    /// The store is asked for `limit` rows but its output is re-sorted and
    /// trimmed here, keeping the newest entries.
    pub async fn recent(&self) -> AppResult<Vec<ChatMessage>> {
        if self.limit == 0 {
            return Ok(Vec::new());
        }

        let mut messages = self.store.recent(self.limit).await?;
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        let excess = messages.len().saturating_sub(self.limit);
        messages.drain(..excess);
        Ok(messages)
    }

    /// Recent messages encoded as outbound chat frames.
    pub async fn frames(&self) -> AppResult<Vec<String>> {
        self.recent()
            .await?
            .into_iter()
            .map(|msg| encode_chat(&ChatFrame::from(msg)).map_err(Into::into))
            .collect()
    }
}
