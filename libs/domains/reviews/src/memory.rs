//! In-memory review repository for tests and local development

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_helpers::Page;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ReviewError, ReviewResult};
use crate::models::{RatingTotals, Review, ReviewFilter, ReviewStatus};
use crate::repository::ReviewRepository;

fn matches(review: &Review, filter: &ReviewFilter) -> bool {
    filter.product_id.is_none_or(|id| id == review.product_id)
        && filter.status.is_none_or(|s| s == review.status)
        && filter.rating.is_none_or(|r| r == review.rating)
        && filter.verified.is_none_or(|v| v == review.verified)
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<HashMap<Uuid, Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Review),
    ) -> ReviewResult<Option<Review>> {
        let mut reviews = self.reviews.write().await;
        Ok(reviews.get_mut(&id).map(|review| {
            f(review);
            review.updated_at = Utc::now();
            review.clone()
        }))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn create(&self, review: Review) -> ReviewResult<Review> {
        let mut reviews = self.reviews.write().await;
        if reviews.values().any(|r| {
            r.product_id == review.product_id && r.reviewer_email == review.reviewer_email
        }) {
            return Err(ReviewError::DuplicateReview {
                product_id: review.product_id,
                email: review.reviewer_email,
            });
        }
        reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        Ok(self.reviews.read().await.get(&id).cloned())
    }

    async fn exists_for_reviewer(&self, product_id: Uuid, email: &str) -> ReviewResult<bool> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .values()
            .any(|r| r.product_id == product_id && r.reviewer_email == email))
    }

    async fn set_status(&self, id: Uuid, status: ReviewStatus) -> ReviewResult<Option<Review>> {
        self.modify(id, |review| review.status = status).await
    }

    async fn delete(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        Ok(self.reviews.write().await.remove(&id))
    }

    async fn increment_helpful(&self, id: Uuid) -> ReviewResult<Option<Review>> {
        self.modify(id, |review| review.helpful_count += 1).await
    }

    async fn list(&self, filter: &ReviewFilter, page: Page) -> ReviewResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        let mut result: Vec<Review> = reviews
            .values()
            .filter(|r| matches(r, filter))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(result
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &ReviewFilter) -> ReviewResult<u64> {
        let reviews = self.reviews.read().await;
        Ok(reviews.values().filter(|r| matches(r, filter)).count() as u64)
    }

    async fn approved_totals(&self, product_id: Uuid) -> ReviewResult<RatingTotals> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .values()
            .filter(|r| r.product_id == product_id && r.is_approved())
            .fold(RatingTotals::default(), |totals, r| RatingTotals {
                sum: totals.sum + i64::from(r.rating),
                count: totals.count + 1,
            }))
    }
}
