use async_trait::async_trait;
use axum_helpers::Page;
use uuid::Uuid;

use crate::error::ReviewResult;
use crate::models::{RatingTotals, Review, ReviewFilter, ReviewStatus};

/// Review persistence
///
/// After creation only `status`, `helpful_count` and `updated_at` change,
/// each through a single-document atomic write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review. Fails with `DuplicateReview` if the reviewer already
    /// reviewed the product, including when two inserts race.
    async fn create(&self, review: Review) -> ReviewResult<Review>;

    async fn get_by_id(&self, id: Uuid) -> ReviewResult<Option<Review>>;

    async fn exists_for_reviewer(&self, product_id: Uuid, email: &str) -> ReviewResult<bool>;

    /// Returns the updated review, or `None` if it does not exist
    async fn set_status(&self, id: Uuid, status: ReviewStatus) -> ReviewResult<Option<Review>>;

    /// Removes a review and returns it
    async fn delete(&self, id: Uuid) -> ReviewResult<Option<Review>>;

    async fn increment_helpful(&self, id: Uuid) -> ReviewResult<Option<Review>>;

    /// Newest first
    async fn list(&self, filter: &ReviewFilter, page: Page) -> ReviewResult<Vec<Review>>;

    async fn count(&self, filter: &ReviewFilter) -> ReviewResult<u64>;

    /// Sum and count of the product's approved ratings
    async fn approved_totals(&self, product_id: Uuid) -> ReviewResult<RatingTotals>;
}
