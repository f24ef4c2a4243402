//! MongoDB implementations of the catalog repositories

use async_trait::async_trait;
use axum_helpers::Page;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    slugify, Category, CategoryFilter, CreateCategory, CreateProduct, Product, ProductFilter,
    UpdateCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository};

fn index(keys: Document, name: &str, unique: bool) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .unique(unique)
                .name(name.to_string())
                .build(),
        )
        .build()
}

/// Escapes regex metacharacters so user search text matches literally.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Product>("products"),
        }
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Initialize indexes for optimal query performance
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            index(doc! { "slug": 1 }, "idx_slug_unique", true),
            index(
                doc! { "category_id": 1, "status": 1, "_id": -1 },
                "idx_category_status",
                false,
            ),
            index(doc! { "price": 1 }, "idx_price", false),
            index(doc! { "featured": 1, "rating": -1 }, "idx_featured_rating", false),
            index(doc! { "tags": 1 }, "idx_tags", false),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(category_id) = filter.category_id {
            doc.insert("category_id", category_id.to_string());
        }

        if let Some(status) = filter.status {
            doc.insert("status", status.to_string());
        }

        if let Some(featured) = filter.featured {
            doc.insert("featured", featured);
        }

        if let Some(in_stock) = filter.in_stock {
            doc.insert("in_stock", in_stock);
        }

        if filter.min_price.is_some() || filter.max_price.is_some() {
            let mut price_filter = doc! {};
            if let Some(min) = filter.min_price {
                price_filter.insert("$gte", min);
            }
            if let Some(max) = filter.max_price {
                price_filter.insert("$lte", max);
            }
            doc.insert("price", price_filter);
        }

        if let Some(min_rating) = filter.min_rating {
            doc.insert("rating", doc! { "$gte": min_rating });
        }

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = escape_regex(search.trim());
            doc.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": &pattern, "$options": "i" } },
                    doc! { "description": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }

        doc
    }

    fn build_update(input: UpdateProduct) -> ProductResult<Document> {
        let mut set = doc! { "updated_at": Utc::now().to_rfc3339() };

        if let Some(name) = input.name {
            set.insert("slug", slugify(&name));
            set.insert("name", name);
        }
        if let Some(description) = input.description {
            set.insert("description", description);
        }
        if let Some(price) = input.price {
            set.insert("price", price);
        }
        if let Some(discount_price) = input.discount_price {
            set.insert("discount_price", discount_price);
        } else if input.clear_discount {
            set.insert("discount_price", Bson::Null);
        }
        if let Some(category_id) = input.category_id {
            set.insert("category_id", category_id.to_string());
        }
        if let Some(images) = input.images {
            set.insert("images", to_bson(&images)?);
        }
        if let Some(thumbnail) = input.thumbnail {
            set.insert("thumbnail", thumbnail);
        }
        if let Some(stock) = input.stock {
            set.insert("stock", stock);
            set.insert("in_stock", stock > 0);
        }
        if let Some(specifications) = input.specifications {
            set.insert("specifications", to_bson(&specifications)?);
        }
        if let Some(features) = input.features {
            set.insert("features", features);
        }
        if let Some(status) = input.status {
            set.insert("status", status.to_string());
        }
        if let Some(featured) = input.featured {
            set.insert("featured", featured);
        }
        if let Some(video_url) = input.video_url {
            set.insert("video_url", video_url);
        }
        if let Some(tags) = input.tags {
            set.insert("tags", tags);
        }

        Ok(doc! { "$set": set })
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let product = Product::new(input);

        self.collection
            .insert_one(&product)
            .await
            .map_err(|e| ProductError::from_write(e, &product.slug))?;

        tracing::info!(product_id = %product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(doc! { "slug": slug }).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ProductFilter, page: Page) -> ProductResult<Vec<Product>> {
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
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(Self::build_filter(filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn featured(&self, limit: u64) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .limit(limit as i64)
            .sort(doc! { "rating": -1, "_id": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "featured": true, "status": "active" })
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProduct) -> ProductResult<Option<Product>> {
        let new_slug = input.name.as_deref().map(slugify);
        let update = Self::build_update(input)?;
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.to_string() }, update)
            .with_options(options)
            .await
            .map_err(|e| match &new_slug {
                Some(slug) => ProductError::from_write(e, slug),
                None => e.into(),
            })?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let removed = self
            .collection
            .find_one_and_delete(doc! { "_id": id.to_string() })
            .await?;

        if removed.is_some() {
            tracing::info!(product_id = %id, "Product deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: Uuid) -> ProductResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "_id": id.to_string() })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn set_rating(&self, id: Uuid, rating: f64, num_reviews: i64) -> ProductResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "rating": rating, "num_reviews": num_reviews } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn ids(&self) -> ProductResult<Vec<Uuid>> {
        let options = FindOptions::builder().projection(doc! { "_id": 1 }).build();
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(doc! {})
            .with_options(options)
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;

        let ids = docs
            .iter()
            .filter_map(|d| d.get_str("_id").ok())
            .filter_map(|raw| match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!(raw_id = raw, error = %e, "Skipping product with malformed id");
                    None
                }
            })
            .collect();

        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn count_in_category(&self, category_id: Uuid) -> ProductResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "category_id": category_id.to_string() })
            .await?;
        Ok(count)
    }
}

/// MongoDB implementation of the CategoryRepository
#[derive(Clone)]
pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Category>("categories"),
        }
    }

    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            index(doc! { "slug": 1 }, "idx_slug_unique", true),
            index(doc! { "order": 1, "name": 1 }, "idx_order_name", false),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Category indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self, input), fields(category_name = %input.name))]
    async fn create(&self, input: CreateCategory) -> ProductResult<Category> {
        let category = Category::new(input);

        self.collection
            .insert_one(&category)
            .await
            .map_err(|e| ProductError::from_write(e, &category.slug))?;

        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Category>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id.to_string() })
            .await?)
    }

    #[instrument(skip(self))]
    async fn get_by_slug(&self, slug: &str) -> ProductResult<Option<Category>> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: CategoryFilter) -> ProductResult<Vec<Category>> {
        let mut query = doc! {};
        if let Some(status) = filter.status {
            query.insert("status", status.to_string());
        }

        let options = FindOptions::builder()
            .sort(doc! { "order": 1, "name": 1 })
            .build();
        let cursor = self.collection.find(query).with_options(options).await?;

        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateCategory) -> ProductResult<Option<Category>> {
        let mut set = doc! { "updated_at": Utc::now().to_rfc3339() };
        let new_slug = input.name.as_deref().map(slugify);

        if let Some(name) = input.name {
            set.insert("slug", slugify(&name));
            set.insert("name", name);
        }
        if let Some(description) = input.description {
            set.insert("description", description);
        }
        if let Some(icon) = input.icon {
            set.insert("icon", icon);
        }
        if let Some(image_url) = input.image_url {
            set.insert("image_url", image_url);
        }
        if let Some(order) = input.order {
            set.insert("order", order);
        }
        if let Some(status) = input.status {
            set.insert("status", status.to_string());
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id.to_string() }, doc! { "$set": set })
            .with_options(options)
            .await
            .map_err(|e| match &new_slug {
                Some(slug) => ProductError::from_write(e, slug),
                None => e.into(),
            })?;

        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await?;

        if result.deleted_count > 0 {
            tracing::info!(category_id = %id, "Category deleted");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn set_product_count(&self, id: Uuid, count: i64) -> ProductResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$set": { "product_count": count } },
            )
            .await?;
        Ok(result.matched_count > 0)
    }
}
