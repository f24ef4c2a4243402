//! In-memory message repository for tests and local development

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_helpers::Page;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::MessageResult;
use crate::models::{Message, MessageFilter, MessagePriority, MessageStatus, StatusCounts};
use crate::repository::MessageRepository;

fn matches(message: &Message, filter: &MessageFilter) -> bool {
    filter.status.is_none_or(|s| s == message.status)
        && filter.priority.is_none_or(|p| p == message.priority)
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<HashMap<Uuid, Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: Message) -> MessageResult<Message> {
        self.messages
            .write()
            .await
            .insert(message.id, message.clone());
        Ok(message)
    }

    async fn get_by_id(&self, id: Uuid) -> MessageResult<Option<Message>> {
        Ok(self.messages.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &MessageFilter, page: Page) -> MessageResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<Message> = messages
            .values()
            .filter(|m| matches(m, filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(found
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &MessageFilter) -> MessageResult<u64> {
        let messages = self.messages.read().await;
        Ok(messages.values().filter(|m| matches(m, filter)).count() as u64)
    }

    async fn status_counts(&self) -> MessageResult<StatusCounts> {
        let messages = self.messages.read().await;
        let mut counts = StatusCounts::default();
        for message in messages.values() {
            counts.add(message.status, 1);
        }
        Ok(counts)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MessageStatus,
        notes: Option<String>,
    ) -> MessageResult<Option<Message>> {
        let mut messages = self.messages.write().await;
        Ok(messages.get_mut(&id).map(|message| {
            message.transition(status, notes, Utc::now());
            message.clone()
        }))
    }

    async fn mark_read_if_new(&self, id: Uuid) -> MessageResult<Option<Message>> {
        let mut messages = self.messages.write().await;
        Ok(messages
            .get_mut(&id)
            .filter(|message| message.status == MessageStatus::New)
            .map(|message| {
                message.transition(MessageStatus::Read, None, Utc::now());
                message.clone()
            }))
    }

    async fn set_priority(
        &self,
        id: Uuid,
        priority: MessagePriority,
    ) -> MessageResult<Option<Message>> {
        let mut messages = self.messages.write().await;
        Ok(messages.get_mut(&id).map(|message| {
            message.priority = priority;
            message.updated_at = Utc::now();
            message.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> MessageResult<bool> {
        Ok(self.messages.write().await.remove(&id).is_some())
    }
}
