//! MongoDB implementation of ReviewRepository

use async_trait::async_trait;
use axum_helpers::Page;
use chrono::Utc;
use database::mongodb::{int_field, is_duplicate_key};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{RatingTotals, Review, ReviewFilter, ReviewStatus};
use crate::repository::ReviewRepository;

#[derive(Clone)]
pub struct MongoReviewRepository {
    collection: Collection<Review>,
}

impl MongoReviewRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Review>("reviews"),
        }
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Review>(collection_name),
        }
    }

    /// Creates indexes, including the one-review-per-reviewer unique index
    pub async fn init_indexes(&self) -> ReviewResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "product_id": 1, "reviewer_email": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_product_reviewer_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "product_id": 1, "status": 1, "_id": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_product_status".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1, "_id": -1 })
                .options(IndexOptions::builder().name("idx_status".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Review indexes created successfully");
        Ok(())
    }

    fn build_filter(filter: &ReviewFilter) -> Document {
        let mut doc = doc! {};

        if let Some(product_id) = filter.product_id {
            doc.insert("product_id", product_id.to_string());
        }
        if let Some(status) = filter.status {
            doc.insert("status", status.to_string());
        }
        if let Some(rating) = filter.rating {
            doc.insert("rating", rating);
        }
        if let Some(verified) = filter.verified {
            doc.insert("verified", verified);
        }

        doc
    }

    fn approved_totals_pipeline(product_id: Uuid) -> Vec<Document> {
        vec![
            doc! { "$match": {
                "product_id": product_id.to_string(),
                "status": ReviewStatus::Approved.to_string(),
            }},
            doc! { "$group": {
                "_id": null,
                "sum": { "$sum": "$rating" },
                "count": { "$sum": 1 },
            }},
        ]
    }

    async fn update_one_returning(
        &self,
        id: Uuid,
        update: Document,
    ) -> ReviewResult<Option<Review>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection
            .find_one_and_update(doc! { "_id": id.to_string() }, update)
            .with_options(options)
            .await?)
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    #[instrument(skip(self, review), fields(product_id = %review.product_id))]
    async fn create(&self, review: Review) -> ReviewResult<Review> {
        match self.collection.insert_one(&review).await {
            Ok(_) => Ok(review),
            Err(e) if is_duplicate_key(&e) => Err(ReviewError::DuplicateReview {
                product_id: review.product_id,
                email: review.reviewer_email,
            }),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?)
    }

    #[instrument(skip(self, email))]
    async fn exists_for_reviewer(&self, product_id: Uuid, email: &str) -> ReviewResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "product_id": product_id.to_string(), "reviewer_email": email })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: Uuid, status: ReviewStatus) -> ReviewResult<Option<Review>> {
        self.update_one_returning(
            id,
            doc! { "$set": {
                "status": status.to_string(),
                "updated_at": Utc::now().to_rfc3339(),
            }},
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        Ok(self
            .collection
            .find_one_and_delete(doc! { "_id": id.to_string() })
            .await?)
    }

    #[instrument(skip(self))]
    async fn increment_helpful(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        self.update_one_returning(
            id,
            doc! {
                "$inc": { "helpful_count": 1_i64 },
                "$set": { "updated_at": Utc::now().to_rfc3339() },
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ReviewFilter, page: Page) -> ReviewResult<Vec<Review>> {
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
    async fn count(&self, filter: &ReviewFilter) -> ReviewResult<u64> {
        Ok(self
            .collection
            .count_documents(Self::build_filter(filter))
            .await?)
    }

    #[instrument(skip(self))]
    async fn approved_totals(&self, product_id: Uuid) -> ReviewResult<RatingTotals> {
        let mut cursor = self
            .collection
            .aggregate(Self::approved_totals_pipeline(product_id))
            .await?;

        // No approved reviews means no group document at all
        let Some(group) = cursor.try_next().await? else {
            return Ok(RatingTotals::default());
        };

        Ok(RatingTotals {
            sum: int_field(&group, "sum").unwrap_or(0),
            count: int_field(&group, "count").unwrap_or(0),
        })
    }
}
