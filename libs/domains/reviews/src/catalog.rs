//! The slice of the product catalog the rating aggregator needs

use std::sync::Arc;

use async_trait::async_trait;
use domain_products::ProductRepository;
use uuid::Uuid;

use crate::error::ReviewResult;
use crate::models::RatingAggregate;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_exists(&self, product_id: Uuid) -> ReviewResult<bool>;

    /// Overwrites `rating` and `num_reviews` in one write. Never creates a
    /// product; returns `false` if none matched.
    async fn update_aggregate_fields(
        &self,
        product_id: Uuid,
        aggregate: RatingAggregate,
    ) -> ReviewResult<bool>;

    async fn product_ids(&self) -> ReviewResult<Vec<Uuid>>;
}

/// [`ProductCatalog`] over the products domain repository
pub struct RepositoryCatalog<P: ProductRepository> {
    products: Arc<P>,
}

impl<P: ProductRepository> RepositoryCatalog<P> {
    pub fn new(products: Arc<P>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl<P: ProductRepository> ProductCatalog for RepositoryCatalog<P> {
    async fn product_exists(&self, product_id: Uuid) -> ReviewResult<bool> {
        Ok(self.products.exists(product_id).await?)
    }

    async fn update_aggregate_fields(
        &self,
        product_id: Uuid,
        aggregate: RatingAggregate,
    ) -> ReviewResult<bool> {
        Ok(self
            .products
            .set_rating(product_id, aggregate.rating, aggregate.num_reviews)
            .await?)
    }

    async fn product_ids(&self) -> ReviewResult<Vec<Uuid>> {
        Ok(self.products.ids().await?)
    }
}
