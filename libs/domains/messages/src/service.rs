//! Contact message workflow
//!
//! Anyone may submit a message; everything else is staff-only and enforced at
//! the router. Opening a `new` message marks it `read`.

use std::sync::Arc;

use axum_helpers::{Page, PaginationMeta};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{MessageError, MessageResult};
use crate::models::{
    CreateMessage, Message, MessageFilter, MessagePage, MessagePriority, MessageStatus,
    ReplyMessage,
};
use crate::repository::MessageRepository;

/// Default page size for the inbox
pub const MESSAGE_PAGE_SIZE: u64 = 20;

pub struct MessageService<R: MessageRepository> {
    repository: Arc<R>,
}

impl<R: MessageRepository> Clone for MessageService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: MessageRepository> MessageService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, input))]
    pub async fn create_message(&self, input: CreateMessage) -> MessageResult<Message> {
        let input = input.normalized();
        input.validate()?;

        let message = self.repository.create(Message::new(input)).await?;
        tracing::info!(message_id = %message.id, priority = %message.priority, "Message received");
        Ok(message)
    }

    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        filter: MessageFilter,
        page: Page,
    ) -> MessageResult<MessagePage> {
        let (data, total, status_counts) = tokio::try_join!(
            self.repository.list(&filter, page),
            self.repository.count(&filter),
            self.repository.status_counts(),
        )?;

        Ok(MessagePage {
            data,
            pagination: PaginationMeta::new(page, total),
            status_counts,
        })
    }

    /// Fetches a message, marking it read if nobody has opened it yet
    #[instrument(skip(self))]
    pub async fn get_message(&self, id: Uuid) -> MessageResult<Message> {
        if let Some(message) = self.repository.mark_read_if_new(id).await? {
            tracing::debug!(message_id = %id, "Message opened for the first time");
            return Ok(message);
        }

        self.repository
            .get_by_id(id)
            .await?
            .ok_or(MessageError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: Uuid) -> MessageResult<Message> {
        self.set_status(id, MessageStatus::Read, None).await
    }

    #[instrument(skip(self, input))]
    pub async fn reply(&self, id: Uuid, input: ReplyMessage) -> MessageResult<Message> {
        input.validate()?;
        self.set_status(id, MessageStatus::Replied, input.notes)
            .await
    }

    #[instrument(skip(self))]
    pub async fn archive(&self, id: Uuid) -> MessageResult<Message> {
        self.set_status(id, MessageStatus::Archived, None).await
    }

    #[instrument(skip(self))]
    pub async fn update_priority(
        &self,
        id: Uuid,
        priority: MessagePriority,
    ) -> MessageResult<Message> {
        let message = self
            .repository
            .set_priority(id, priority)
            .await?
            .ok_or(MessageError::NotFound(id))?;
        tracing::info!(message_id = %id, %priority, "Message priority changed");
        Ok(message)
    }

    #[instrument(skip(self))]
    pub async fn delete_message(&self, id: Uuid) -> MessageResult<()> {
        if !self.repository.delete(id).await? {
            return Err(MessageError::NotFound(id));
        }
        tracing::info!(message_id = %id, "Message deleted");
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: MessageStatus,
        notes: Option<String>,
    ) -> MessageResult<Message> {
        let message = self
            .repository
            .set_status(id, status, notes)
            .await?
            .ok_or(MessageError::NotFound(id))?;
        tracing::info!(message_id = %id, %status, "Message status changed");
        Ok(message)
    }
}
