use async_trait::async_trait;
use axum_helpers::Page;
use uuid::Uuid;

use crate::error::MessageResult;
use crate::models::{Message, MessageFilter, MessagePriority, MessageStatus, StatusCounts};

/// Contact message persistence
///
/// Status and priority changes are single-document atomic writes that return
/// the updated message, or `None` when it does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: Message) -> MessageResult<Message>;

    async fn get_by_id(&self, id: Uuid) -> MessageResult<Option<Message>>;

    /// Newest first
    async fn list(&self, filter: &MessageFilter, page: Page) -> MessageResult<Vec<Message>>;

    async fn count(&self, filter: &MessageFilter) -> MessageResult<u64>;

    /// Counts over the whole collection, ignoring any filter
    async fn status_counts(&self) -> MessageResult<StatusCounts>;

    /// Sets the status, stamping `replied_at`/`archived_at` the first time.
    /// `notes`, when given, replaces the stored notes.
    async fn set_status(
        &self,
        id: Uuid,
        status: MessageStatus,
        notes: Option<String>,
    ) -> MessageResult<Option<Message>>;

    /// `new` to `read` only; returns `None` if the message was not `new`
    async fn mark_read_if_new(&self, id: Uuid) -> MessageResult<Option<Message>>;

    async fn set_priority(
        &self,
        id: Uuid,
        priority: MessagePriority,
    ) -> MessageResult<Option<Message>>;

    /// Returns whether a message was removed
    async fn delete(&self, id: Uuid) -> MessageResult<bool>;
}
