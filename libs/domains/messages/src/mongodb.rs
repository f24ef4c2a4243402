//! MongoDB implementation of MessageRepository

use std::str::FromStr;

use async_trait::async_trait;
use axum_helpers::Page;
use chrono::Utc;
use database::mongodb::int_field;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{
        FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument, UpdateModifications,
    },
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::MessageResult;
use crate::models::{Message, MessageFilter, MessagePriority, MessageStatus, StatusCounts};
use crate::repository::MessageRepository;

fn index(keys: Document, name: &str) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().name(name.to_string()).build())
        .build()
}

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<Message>,
}

impl MongoMessageRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Message>("messages"),
        }
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Message>(collection_name),
        }
    }

    pub async fn init_indexes(&self) -> MessageResult<()> {
        let indexes = vec![
            index(doc! { "status": 1, "_id": -1 }, "idx_status_created"),
            index(doc! { "priority": 1, "status": 1 }, "idx_priority_status"),
            index(doc! { "email": 1 }, "idx_email"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Message indexes created successfully");
        Ok(())
    }

    fn build_filter(filter: &MessageFilter) -> Document {
        let mut doc = doc! {};

        if let Some(status) = filter.status {
            doc.insert("status", status.to_string());
        }
        if let Some(priority) = filter.priority {
            doc.insert("priority", priority.to_string());
        }

        doc
    }

    /// Pipeline-style update so the first `replied_at`/`archived_at` survives
    /// repeated transitions without a read-modify-write.
    fn status_update(status: MessageStatus, notes: Option<String>, now: &str) -> Vec<Document> {
        let mut set = doc! {
            "status": status.to_string(),
            "updated_at": now,
        };

        match status {
            MessageStatus::Replied => {
                set.insert("replied_at", doc! { "$ifNull": ["$replied_at", now] });
            }
            MessageStatus::Archived => {
                set.insert("archived_at", doc! { "$ifNull": ["$archived_at", now] });
            }
            MessageStatus::New | MessageStatus::Read => {}
        }

        // notes are free text; a leading '$' must not read as a field path
        if let Some(notes) = notes {
            set.insert("notes", doc! { "$literal": notes });
        }

        vec![doc! { "$set": set }]
    }

    fn status_counts_pipeline() -> Vec<Document> {
        vec![doc! { "$group": { "_id": "$status", "count": { "$sum": 1 } } }]
    }

    async fn update_one_returning(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> MessageResult<Option<Message>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(filter, update)
            .with_options(options)
            .await?)
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: Message) -> MessageResult<Message> {
        self.collection.insert_one(&message).await?;
        Ok(message)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> MessageResult<Option<Message>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &MessageFilter, page: Page) -> MessageResult<Vec<Message>> {
        // uuid v7 ids sort by creation time
        let options = FindOptions::builder()
            .limit(page.limit as i64)
            .skip(page.offset())
            .sort(doc! { "_id": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(filter))
            .with_options(options)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &MessageFilter) -> MessageResult<u64> {
        Ok(self
            .collection
            .count_documents(Self::build_filter(filter))
            .await?)
    }

    #[instrument(skip(self))]
    async fn status_counts(&self) -> MessageResult<StatusCounts> {
        let mut cursor = self
            .collection
            .aggregate(Self::status_counts_pipeline())
            .await?;

        let mut counts = StatusCounts::default();
        while let Some(group) = cursor.try_next().await? {
            let status = group.get_str("_id").ok().map(MessageStatus::from_str);
            let count = int_field(&group, "count").unwrap_or(0);
            match status {
                Some(Ok(status)) => counts.add(status, count.max(0) as u64),
                _ => tracing::warn!(?group, "Skipping messages with an unknown status"),
            }
        }
        Ok(counts)
    }

    #[instrument(skip(self, notes))]
    async fn set_status(
        &self,
        id: Uuid,
        status: MessageStatus,
        notes: Option<String>,
    ) -> MessageResult<Option<Message>> {
        let now = Utc::now().to_rfc3339();
        self.update_one_returning(
            doc! { "_id": id.to_string() },
            Self::status_update(status, notes, &now),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn mark_read_if_new(&self, id: Uuid) -> MessageResult<Option<Message>> {
        self.update_one_returning(
            doc! { "_id": id.to_string(), "status": MessageStatus::New.to_string() },
            doc! { "$set": {
                "status": MessageStatus::Read.to_string(),
                "updated_at": Utc::now().to_rfc3339(),
            }},
        )
        .await
    }

    #[instrument(skip(self))]
    async fn set_priority(
        &self,
        id: Uuid,
        priority: MessagePriority,
    ) -> MessageResult<Option<Message>> {
        self.update_one_returning(
            doc! { "_id": id.to_string() },
            doc! { "$set": {
                "priority": priority.to_string(),
                "updated_at": Utc::now().to_rfc3339(),
            }},
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> MessageResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        let doc = MongoMessageRepository::build_filter(&MessageFilter {
            status: Some(MessageStatus::Replied),
            priority: None,
        });

        assert_eq!(doc.get_str("status").unwrap(), "replied");
        assert!(!doc.contains_key("priority"));
    }

    #[test]
    fn test_reply_update_keeps_first_replied_at() {
        let pipeline = MongoMessageRepository::status_update(
            MessageStatus::Replied,
            Some("$refund issued".into()),
            "2026-01-01T00:00:00+00:00",
        );

        let set = pipeline[0].get_document("$set").unwrap();
        assert_eq!(set.get_str("status").unwrap(), "replied");
        let if_null = set
            .get_document("replied_at")
            .unwrap()
            .get_array("$ifNull")
            .unwrap();
        assert_eq!(if_null[0].as_str(), Some("$replied_at"));
        assert_eq!(
            set.get_document("notes").unwrap().get_str("$literal").unwrap(),
            "$refund issued"
        );
        assert!(!set.contains_key("archived_at"));
    }

    #[test]
    fn test_read_update_touches_no_timestamps_or_notes() {
        let pipeline =
            MongoMessageRepository::status_update(MessageStatus::Read, None, "2026-01-01T00:00:00Z");

        let set = pipeline[0].get_document("$set").unwrap();
        assert!(!set.contains_key("replied_at"));
        assert!(!set.contains_key("archived_at"));
        assert!(!set.contains_key("notes"));
    }

    #[test]
    fn test_status_counts_groups_by_status() {
        let pipeline = MongoMessageRepository::status_counts_pipeline();
        let group = pipeline[0].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$status");
    }
}
