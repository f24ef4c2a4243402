use async_trait::async_trait;
use axum_helpers::Page;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{
    Category, CategoryFilter, CreateCategory, CreateProduct, Product, ProductFilter,
    UpdateCategory, UpdateProduct,
};

/// Repository trait for Product persistence
///
/// Implementations must never modify `rating` or `num_reviews` outside of
/// [`set_rating`](ProductRepository::set_rating).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Create a new product. Fails with `DuplicateSlug` if the derived slug is taken.
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>>;

    /// List products matching a filter, newest first
    async fn list(&self, filter: &ProductFilter, page: Page) -> ProductResult<Vec<Product>>;

    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64>;

    /// Active featured products, best rated first
    async fn featured(&self, limit: u64) -> ProductResult<Vec<Product>>;

    /// Set only the fields present in `input`. Returns `None` if the product does not exist.
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>>;

    /// Delete a product, returning the removed record
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>>;

    async fn exists(&self, id: Uuid) -> ProductResult<bool>;

    /// Overwrite the cached rating summary in one atomic write.
    ///
    /// Never creates a product. Returns `false` if `id` matched nothing.
    async fn set_rating(&self, id: Uuid, rating: f64, num_reviews: i64) -> ProductResult<bool>;

    /// Every product id, used by the rating backfill
    async fn ids(&self) -> ProductResult<Vec<Uuid>>;

    async fn count_in_category(&self, category_id: Uuid) -> ProductResult<u64>;
}

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, input: CreateCategory) -> ProductResult<Category>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Category>>;

    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Category>>;

    /// Categories ordered by `order`, then name
    async fn list(&self, filter: CategoryFilter) -> ProductResult<Vec<Category>>;

    async fn update(&self, id: Uuid, input: UpdateCategory) -> ProductResult<Option<Category>>;

    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    /// Returns `false` if the category does not exist
    async fn set_product_count(&self, id: Uuid, count: i64) -> ProductResult<bool>;
}
