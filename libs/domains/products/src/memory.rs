//! In-memory repositories for tests and local development

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_helpers::Page;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    Category, CategoryFilter, CreateCategory, CreateProduct, Product, ProductFilter,
    ProductStatus, UpdateCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};

fn matches(product: &Product, filter: &ProductFilter) -> bool {
    if filter.category_id.is_some() && product.category_id != filter.category_id {
        return false;
    }
    if filter.status.is_some_and(|s| s != product.status) {
        return false;
    }
    if filter.featured.is_some_and(|f| f != product.featured) {
        return false;
    }
    if filter.in_stock.is_some_and(|s| s != product.in_stock) {
        return false;
    }
    if filter.min_price.is_some_and(|min| product.price < min) {
        return false;
    }
    if filter.max_price.is_some_and(|max| product.price > max) {
        return false;
    }
    if filter.min_rating.is_some_and(|min| product.rating < min) {
        return false;
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        if !product.name.to_lowercase().contains(&needle)
            && !product.description.to_lowercase().contains(&needle)
        {
            return false;
        }
    }
    true
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a product as-is, including its rating fields.
    pub async fn insert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    fn slug_taken(products: &HashMap<Uuid, Product>, slug: &str, except: Option<Uuid>) -> bool {
        products
            .values()
            .any(|p| p.slug == slug && Some(p.id) != except)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        let mut products = self.products.write().await;
        if Self::slug_taken(&products, &product.slug, None) {
            return Err(ProductError::DuplicateSlug(product.slug));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.values().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, filter: &ProductFilter, page: Page) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = products
            .values()
            .filter(|p| matches(p, filter))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(result
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| matches(p, filter)).count() as u64)
    }

    async fn featured(&self, limit: u64) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut result: Vec<Product> = products
            .values()
            .filter(|p| p.featured && p.status == ProductStatus::Active)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.rating.total_cmp(&a.rating).then(b.id.cmp(&a.id)));
        result.truncate(limit as usize);
        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(existing) = products.get(&id) else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        updated.apply_update(input);
        if Self::slug_taken(&products, &updated.slug, Some(id)) {
            return Err(ProductError::DuplicateSlug(updated.slug));
        }
        products.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.write().await.remove(&id))
    }

    async fn exists(&self, id: Uuid) -> ProductResult<bool> {
        Ok(self.products.read().await.contains_key(&id))
    }

    async fn set_rating(&self, id: Uuid, rating: f64, num_reviews: i64) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(product) => {
                product.rating = rating;
                product.num_reviews = num_reviews;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ids(&self) -> ProductResult<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self.products.read().await.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    async fn count_in_category(&self, category_id: Uuid) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.category_id == Some(category_id))
            .count() as u64)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCategoryRepository {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, input: CreateCategory) -> ProductResult<Category> {
        let category = Category::new(input);
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.slug == category.slug) {
            return Err(ProductError::DuplicateSlug(category.slug));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self, filter: CategoryFilter) -> ProductResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut result: Vec<Category> = categories
            .values()
            .filter(|c| filter.status.is_none_or(|s| s == c.status))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateCategory) -> ProductResult<Option<Category>> {
        let mut categories = self.categories.write().await;
        let Some(existing) = categories.get(&id) else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        updated.apply_update(input);
        if categories
            .values()
            .any(|c| c.slug == updated.slug && c.id != id)
        {
            return Err(ProductError::DuplicateSlug(updated.slug));
        }
        categories.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        Ok(self.categories.write().await.remove(&id).is_some())
    }

    async fn set_product_count(&self, id: Uuid, count: i64) -> ProductResult<bool> {
        let mut categories = self.categories.write().await;
        match categories.get_mut(&id) {
            Some(category) => {
                category.product_count = count;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
