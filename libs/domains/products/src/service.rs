//! Catalog services - business logic layer

use std::sync::Arc;

use axum_helpers::{Page, Paginated};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    check_discount, Category, CategoryFilter, CreateCategory, CreateProduct, Product,
    ProductFilter, UpdateCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};

/// Default page size for product listings
pub const PRODUCT_PAGE_SIZE: u64 = 12;

/// Number of products on the featured shelf
pub const FEATURED_LIMIT: u64 = 6;

/// Product service providing business logic operations
///
/// Keeps each category's `product_count` in step with product create, delete
/// and reassignment. Count refreshes are best effort: a failure is logged and
/// the product operation still succeeds.
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository, C: CategoryRepository> Clone for ProductService<P, C> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(products: Arc<P>, categories: Arc<C>) -> Self {
        Self {
            products,
            categories,
        }
    }

    pub fn repository(&self) -> &Arc<P> {
        &self.products
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        if let Some(category_id) = input.category_id {
            self.ensure_category(category_id).await?;
        }

        let product = self.products.create(input).await?;
        self.refresh_category_count(product.category_id).await;

        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::not_found(id))
    }

    /// Looks a product up by id, falling back to its slug.
    #[instrument(skip(self))]
    pub async fn find_product(&self, id_or_slug: &str) -> ProductResult<Product> {
        let found = match Uuid::parse_str(id_or_slug) {
            Ok(id) => self.products.get_by_id(id).await?,
            Err(_) => self.products.get_by_slug(id_or_slug).await?,
        };

        found.ok_or_else(|| ProductError::NotFound(id_or_slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: ProductFilter) -> ProductResult<Paginated<Product>> {
        let page = Page::new(
            filter.page.unwrap_or(1),
            filter.limit.unwrap_or(PRODUCT_PAGE_SIZE),
        );

        let data = self.products.list(&filter, page).await?;
        let total = self.products.count(&filter).await?;

        Ok(Paginated::new(data, page, total))
    }

    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> ProductResult<Vec<Product>> {
        self.products.featured(FEATURED_LIMIT).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Product> {
        input.validate()?;

        let existing = self.get_product(id).await?;

        let price = input.price.unwrap_or(existing.price);
        let discount = input.discount_after(existing.discount_price);
        check_discount(price, discount).map_err(|e| {
            ProductError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            )
        })?;

        let reassigned = input
            .category_id
            .filter(|new| existing.category_id != Some(*new));
        if let Some(category_id) = reassigned {
            self.ensure_category(category_id).await?;
        }

        let updated = self
            .products
            .update(id, input)
            .await?
            .ok_or_else(|| ProductError::not_found(id))?;

        if reassigned.is_some() {
            self.refresh_category_count(existing.category_id).await;
            self.refresh_category_count(updated.category_id).await;
        }

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let removed = self
            .products
            .delete(id)
            .await?
            .ok_or_else(|| ProductError::not_found(id))?;

        self.refresh_category_count(removed.category_id).await;
        Ok(())
    }

    async fn ensure_category(&self, category_id: Uuid) -> ProductResult<()> {
        match self.categories.get_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(ProductError::Validation(format!(
                "Category {} does not exist",
                category_id
            ))),
        }
    }

    async fn refresh_category_count(&self, category_id: Option<Uuid>) {
        let Some(category_id) = category_id else {
            return;
        };

        let result = async {
            let count = self.products.count_in_category(category_id).await?;
            self.categories
                .set_product_count(category_id, count as i64)
                .await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!(%category_id, error = %e, "Failed to refresh category product count");
        }
    }
}

/// Category service
pub struct CategoryService<C: CategoryRepository, P: ProductRepository> {
    categories: Arc<C>,
    products: Arc<P>,
}

impl<C: CategoryRepository, P: ProductRepository> Clone for CategoryService<C, P> {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
            products: Arc::clone(&self.products),
        }
    }
}

impl<C: CategoryRepository, P: ProductRepository> CategoryService<C, P> {
    pub fn new(categories: Arc<C>, products: Arc<P>) -> Self {
        Self {
            categories,
            products,
        }
    }

    #[instrument(skip(self, input), fields(category_name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> ProductResult<Category> {
        input.validate()?;
        self.categories.create(input).await
    }

    #[instrument(skip(self))]
    pub async fn find_category(&self, id_or_slug: &str) -> ProductResult<Category> {
        let found = match Uuid::parse_str(id_or_slug) {
            Ok(id) => self.categories.get_by_id(id).await?,
            Err(_) => self.categories.get_by_slug(id_or_slug).await?,
        };

        found.ok_or_else(|| ProductError::CategoryNotFound(id_or_slug.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self, filter: CategoryFilter) -> ProductResult<Vec<Category>> {
        self.categories.list(filter).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: Uuid,
        input: UpdateCategory,
    ) -> ProductResult<Category> {
        input.validate()?;
        self.categories
            .update(id, input)
            .await?
            .ok_or_else(|| ProductError::category_not_found(id))
    }

    /// Refuses while any product still references the category.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: Uuid) -> ProductResult<()> {
        let count = self.products.count_in_category(id).await?;
        if count > 0 {
            return Err(ProductError::CategoryInUse { id, count });
        }

        if !self.categories.delete(id).await? {
            return Err(ProductError::category_not_found(id));
        }

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
