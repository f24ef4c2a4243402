//! Review lifecycle
//!
//! Every mutation that can change the set of approved reviews of a product is
//! persisted first and then followed by a full rating recompute for that
//! product. Creation is not such a mutation: new reviews are pending.

use std::sync::Arc;

use axum_helpers::{Caller, Page, Paginated};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::aggregator::RatingAggregator;
use crate::catalog::ProductCatalog;
use crate::error::{ReviewError, ReviewResult};
use crate::models::{CreateReview, RatingAggregate, Review, ReviewFilter, ReviewStatus};
use crate::policy::ModerationPolicy;
use crate::repository::ReviewRepository;

/// Default page size for review listings
pub const REVIEW_PAGE_SIZE: u64 = 10;

pub struct ReviewService<R: ReviewRepository, C: ProductCatalog> {
    reviews: Arc<R>,
    catalog: Arc<C>,
    aggregator: RatingAggregator<R, C>,
    policy: Arc<dyn ModerationPolicy>,
}

impl<R: ReviewRepository, C: ProductCatalog> Clone for ReviewService<R, C> {
    fn clone(&self) -> Self {
        Self {
            reviews: Arc::clone(&self.reviews),
            catalog: Arc::clone(&self.catalog),
            aggregator: self.aggregator.clone(),
            policy: Arc::clone(&self.policy),
        }
    }
}

impl<R: ReviewRepository, C: ProductCatalog> ReviewService<R, C> {
    pub fn new(reviews: Arc<R>, catalog: Arc<C>, policy: Arc<dyn ModerationPolicy>) -> Self {
        Self {
            aggregator: RatingAggregator::new(Arc::clone(&reviews), Arc::clone(&catalog)),
            reviews,
            catalog,
            policy,
        }
    }

    pub fn aggregator(&self) -> &RatingAggregator<R, C> {
        &self.aggregator
    }

    /// Submit a review. It starts pending, so the product rating is untouched.
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn create_review(&self, input: CreateReview) -> ReviewResult<Review> {
        let input = input.normalized();
        input.validate()?;

        if !self.catalog.product_exists(input.product_id).await? {
            return Err(ReviewError::ProductNotFound(input.product_id));
        }

        if self
            .reviews
            .exists_for_reviewer(input.product_id, &input.reviewer_email)
            .await?
        {
            return Err(ReviewError::DuplicateReview {
                product_id: input.product_id,
                email: input.reviewer_email,
            });
        }

        let review = self.reviews.create(Review::new(input)).await?;
        tracing::info!(review_id = %review.id, "Review submitted");
        Ok(review)
    }

    /// Non-approved reviews are hidden from non-moderators as if absent.
    #[instrument(skip(self, caller))]
    pub async fn get_review(&self, caller: &Caller, id: Uuid) -> ReviewResult<Review> {
        let review = self
            .reviews
            .get_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        if !review.is_approved() && !self.policy.is_moderator(caller) {
            return Err(ReviewError::NotFound(id));
        }
        Ok(review)
    }

    #[instrument(skip(self, caller))]
    pub async fn list_reviews(
        &self,
        caller: &Caller,
        mut filter: ReviewFilter,
        page: Page,
    ) -> ReviewResult<Paginated<Review>> {
        if !self.policy.is_moderator(caller) {
            filter.status = Some(ReviewStatus::Approved);
        }
        self.paginate(&filter, page).await
    }

    /// Approved reviews of one product, newest first
    #[instrument(skip(self))]
    pub async fn list_approved_reviews(
        &self,
        product_id: Uuid,
        page: Page,
    ) -> ReviewResult<Paginated<Review>> {
        self.paginate(&ReviewFilter::approved_for(product_id), page)
            .await
    }

    pub async fn approve_review(&self, caller: &Caller, id: Uuid) -> ReviewResult<Review> {
        self.set_review_status(caller, id, ReviewStatus::Approved)
            .await
    }

    pub async fn reject_review(&self, caller: &Caller, id: Uuid) -> ReviewResult<Review> {
        self.set_review_status(caller, id, ReviewStatus::Rejected)
            .await
    }

    /// Moves a review to `approved` or `rejected` and recomputes its product,
    /// even when the status did not actually change.
    #[instrument(skip(self, caller))]
    pub async fn set_review_status(
        &self,
        caller: &Caller,
        id: Uuid,
        status: ReviewStatus,
    ) -> ReviewResult<Review> {
        self.require_moderator(caller)?;

        if status == ReviewStatus::Pending {
            return Err(ReviewError::Validation(
                "A review cannot be moved back to pending".to_string(),
            ));
        }

        let review = self
            .reviews
            .set_status(id, status)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        tracing::info!(review_id = %id, %status, moderator = ?caller.subject(), "Review moderated");
        self.refresh_rating(review.product_id).await;

        Ok(review)
    }

    #[instrument(skip(self, caller))]
    pub async fn delete_review(&self, caller: &Caller, id: Uuid) -> ReviewResult<()> {
        self.require_moderator(caller)?;

        let removed = self
            .reviews
            .delete(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        tracing::info!(review_id = %id, moderator = ?caller.subject(), "Review deleted");
        self.refresh_rating(removed.product_id).await;

        Ok(())
    }

    /// Helpful votes do not affect the rating.
    #[instrument(skip(self))]
    pub async fn increment_helpful(&self, id: Uuid) -> ReviewResult<Review> {
        self.reviews
            .increment_helpful(id)
            .await?
            .ok_or(ReviewError::NotFound(id))
    }

    /// Moderator-triggered recompute. Unlike the automatic one, errors are returned.
    #[instrument(skip(self, caller))]
    pub async fn recompute_product(
        &self,
        caller: &Caller,
        product_id: Uuid,
    ) -> ReviewResult<RatingAggregate> {
        self.require_moderator(caller)?;

        self.aggregator
            .recompute(product_id)
            .await?
            .ok_or(ReviewError::ProductNotFound(product_id))
    }

    fn require_moderator(&self, caller: &Caller) -> ReviewResult<()> {
        if self.policy.is_moderator(caller) {
            Ok(())
        } else {
            Err(ReviewError::Forbidden(
                "Moderator role required".to_string(),
            ))
        }
    }

    async fn paginate(&self, filter: &ReviewFilter, page: Page) -> ReviewResult<Paginated<Review>> {
        let data = self.reviews.list(filter, page).await?;
        let total = self.reviews.count(filter).await?;
        Ok(Paginated::new(data, page, total))
    }

    /// Never fails the caller: the review change is already persisted.
    async fn refresh_rating(&self, product_id: Uuid) {
        if let Err(e) = self.aggregator.recompute(product_id).await {
            tracing::warn!(%product_id, error = %e, "Rating recompute failed; next trigger will correct it");
        }
    }
}
