//! Recomputes a product's cached rating from its approved reviews

use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::catalog::ProductCatalog;
use crate::error::ReviewResult;
use crate::models::RatingAggregate;
use crate::repository::ReviewRepository;

/// Full recomputation, never deltas: every run reads all approved reviews of
/// the product and overwrites both aggregate fields. Concurrent runs for the
/// same product are last-writer-wins; the next trigger corrects any stale value.
pub struct RatingAggregator<R: ReviewRepository, C: ProductCatalog> {
    reviews: Arc<R>,
    catalog: Arc<C>,
}

impl<R: ReviewRepository, C: ProductCatalog> Clone for RatingAggregator<R, C> {
    fn clone(&self) -> Self {
        Self {
            reviews: Arc::clone(&self.reviews),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<R: ReviewRepository, C: ProductCatalog> RatingAggregator<R, C> {
    pub fn new(reviews: Arc<R>, catalog: Arc<C>) -> Self {
        Self { reviews, catalog }
    }

    /// Returns the aggregate written, or `None` if the product no longer exists.
    #[instrument(skip(self))]
    pub async fn recompute(&self, product_id: Uuid) -> ReviewResult<Option<RatingAggregate>> {
        if !self.catalog.product_exists(product_id).await? {
            tracing::debug!(%product_id, "Skipping recompute for missing product");
            return Ok(None);
        }

        let totals = self.reviews.approved_totals(product_id).await?;
        let aggregate = RatingAggregate::from(totals);

        if !self
            .catalog
            .update_aggregate_fields(product_id, aggregate)
            .await?
        {
            tracing::debug!(%product_id, "Product removed before rating write");
            return Ok(None);
        }

        tracing::debug!(
            %product_id,
            rating = aggregate.rating,
            num_reviews = aggregate.num_reviews,
            "Product rating recomputed"
        );
        Ok(Some(aggregate))
    }

    /// Recomputes each product in turn, returning how many were refreshed.
    ///
    /// A failure on one product is logged and does not stop the rest.
    #[instrument(skip(self, product_ids), fields(products = product_ids.len()))]
    pub async fn recompute_many(&self, product_ids: &[Uuid]) -> usize {
        let mut refreshed = 0;
        for &product_id in product_ids {
            match self.recompute(product_id).await {
                Ok(Some(_)) => refreshed += 1,
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(%product_id, error = %e, "Rating recompute failed");
                }
            }
        }
        refreshed
    }

    /// Recomputes every product in the catalog.
    pub async fn backfill(&self) -> ReviewResult<usize> {
        let product_ids = self.catalog.product_ids().await?;
        let refreshed = self.recompute_many(&product_ids).await;
        tracing::info!(
            refreshed,
            total = product_ids.len(),
            "Product rating backfill complete"
        );
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockProductCatalog;
    use crate::error::ReviewError;
    use crate::models::RatingTotals;
    use crate::repository::MockReviewRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_recompute_writes_rounded_mean() {
        let product_id = Uuid::now_v7();

        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_approved_totals()
            .with(eq(product_id))
            .returning(|_| Ok(RatingTotals { sum: 11, count: 3 }));

        let mut catalog = MockProductCatalog::new();
        catalog.expect_product_exists().returning(|_| Ok(true));
        catalog
            .expect_update_aggregate_fields()
            .withf(move |id, aggregate| {
                *id == product_id && aggregate.rating == 3.7 && aggregate.num_reviews == 3
            })
            .times(1)
            .returning(|_, _| Ok(true));

        let aggregator = RatingAggregator::new(Arc::new(reviews), Arc::new(catalog));
        let aggregate = aggregator.recompute(product_id).await.unwrap();

        assert_eq!(
            aggregate,
            Some(RatingAggregate {
                rating: 3.7,
                num_reviews: 3
            })
        );
    }

    #[tokio::test]
    async fn test_recompute_missing_product_is_noop() {
        let mut catalog = MockProductCatalog::new();
        catalog.expect_product_exists().returning(|_| Ok(false));
        catalog.expect_update_aggregate_fields().never();

        let mut reviews = MockReviewRepository::new();
        reviews.expect_approved_totals().never();

        let aggregator = RatingAggregator::new(Arc::new(reviews), Arc::new(catalog));
        assert_eq!(aggregator.recompute(Uuid::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_recompute_without_approved_reviews_writes_zero() {
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_approved_totals()
            .returning(|_| Ok(RatingTotals::default()));

        let mut catalog = MockProductCatalog::new();
        catalog.expect_product_exists().returning(|_| Ok(true));
        catalog
            .expect_update_aggregate_fields()
            .withf(|_, aggregate| *aggregate == RatingAggregate::EMPTY)
            .returning(|_, _| Ok(true));

        let aggregator = RatingAggregator::new(Arc::new(reviews), Arc::new(catalog));
        assert_eq!(
            aggregator.recompute(Uuid::now_v7()).await.unwrap(),
            Some(RatingAggregate::EMPTY)
        );
    }

    #[tokio::test]
    async fn test_recompute_many_counts_refreshed_and_skips_failures() {
        let ok = Uuid::now_v7();
        let gone = Uuid::now_v7();
        let broken = Uuid::now_v7();

        let mut reviews = MockReviewRepository::new();
        reviews.expect_approved_totals().returning(move |id| {
            if id == broken {
                Err(ReviewError::Database("cursor killed".into()))
            } else {
                Ok(RatingTotals { sum: 4, count: 1 })
            }
        });

        let mut catalog = MockProductCatalog::new();
        catalog
            .expect_product_exists()
            .returning(move |id| Ok(id != gone));
        catalog
            .expect_update_aggregate_fields()
            .times(1)
            .returning(|_, _| Ok(true));

        let aggregator = RatingAggregator::new(Arc::new(reviews), Arc::new(catalog));
        assert_eq!(aggregator.recompute_many(&[ok, gone, broken]).await, 1);
    }
}
