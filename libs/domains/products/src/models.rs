use chrono::{DateTime, Utc};
use database::mongodb::uuid_as_string;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Product status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductStatus {
    /// Listed and purchasable
    #[default]
    Active,
    /// Hidden from the storefront
    Inactive,
    /// No longer sold; kept for order history and reviews
    Discontinued,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductImage {
    #[validate(url)]
    pub url: String,
    /// Alternative text for accessibility
    #[serde(default)]
    pub alt: Option<String>,
}

/// One row of the specification table, e.g. `Weight: 1.2 kg`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Specification {
    #[validate(length(min = 1, max = 100))]
    pub key: String,
    #[validate(length(min = 1, max = 500))]
    pub value: String,
}

/// Product entity as stored in MongoDB
///
/// `rating` and `num_reviews` are a cache of the product's approved reviews.
/// They are written only through [`ProductRepository::set_rating`](crate::ProductRepository::set_rating);
/// create and update never touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    pub name: String,
    /// URL-safe, unique
    pub slug: String,
    pub description: String,
    /// Price in cents
    pub price: i64,
    /// Sale price in cents, always below `price`
    #[serde(default)]
    pub discount_price: Option<i64>,
    #[serde(default, with = "uuid_as_string::option")]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub stock: i32,
    /// Derived: `stock > 0`
    pub in_stock: bool,
    #[serde(default)]
    pub specifications: Vec<Specification>,
    #[serde(default)]
    pub features: Vec<String>,
    /// Mean approved rating, one decimal, 0 when unrated
    #[serde(default)]
    pub rating: f64,
    /// Number of approved reviews
    #[serde(default)]
    pub num_reviews: i64,
    pub status: ProductStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_discount_on_create"))]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    /// Price in cents
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    pub discount_price: Option<i64>,
    pub category_id: Option<Uuid>,
    #[validate(nested)]
    #[serde(default)]
    pub images: Vec<ProductImage>,
    pub thumbnail: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
    #[validate(nested)]
    #[serde(default)]
    pub specifications: Vec<Specification>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub featured: bool,
    #[validate(url)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// DTO for updating an existing product; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(range(min = 0))]
    pub discount_price: Option<i64>,
    /// Drops the current discount; a `discount_price` in the same request wins
    #[serde(default)]
    pub clear_discount: bool,
    pub category_id: Option<Uuid>,
    #[validate(nested)]
    pub images: Option<Vec<ProductImage>>,
    pub thumbnail: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(nested)]
    pub specifications: Option<Vec<Specification>>,
    pub features: Option<Vec<String>>,
    pub status: Option<ProductStatus>,
    pub featured: Option<bool>,
    #[validate(url)]
    pub video_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateProduct {
    /// Discount the product carries once this update is applied.
    pub fn discount_after(&self, current: Option<i64>) -> Option<i64> {
        match (self.discount_price, self.clear_discount) {
            (Some(discount), _) => Some(discount),
            (None, true) => None,
            (None, false) => current,
        }
    }
}

/// Query filters for listing products
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub status: Option<ProductStatus>,
    pub featured: Option<bool>,
    pub in_stock: Option<bool>,
    /// Minimum price in cents
    pub min_price: Option<i64>,
    /// Maximum price in cents
    pub max_price: Option<i64>,
    /// Only products rated at least this much
    pub min_rating: Option<f64>,
    /// Case-insensitive match on name and description
    pub search: Option<String>,
    /// 1-based page (default 1)
    pub page: Option<u64>,
    /// Page size (default 12)
    pub limit: Option<u64>,
}

/// Category status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CategoryStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename = "_id", alias = "id", with = "uuid_as_string")]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Display position, ascending
    #[serde(default)]
    pub order: i32,
    pub status: CategoryStatus,
    /// Number of products referencing this category; maintained by the product service
    #[serde(default)]
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub icon: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub status: CategoryStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub icon: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub order: Option<i32>,
    pub status: Option<CategoryStatus>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    pub status: Option<CategoryStatus>,
}

fn validate_discount_on_create(input: &CreateProduct) -> Result<(), ValidationError> {
    check_discount(input.price, input.discount_price)
}

/// A discount must be strictly below the regular price.
pub fn check_discount(price: i64, discount_price: Option<i64>) -> Result<(), ValidationError> {
    match discount_price {
        Some(discount) if discount >= price => Err(ValidationError::new("discount_price")
            .with_message("Discount price must be less than the regular price".into())),
        _ => Ok(()),
    }
}

/// Lowercase, ASCII alphanumerics separated by single dashes.
///
/// ```
/// assert_eq!(domain_products::models::slugify("  Wireless Mouse (Black) "), "wireless-mouse-black");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            slug: slugify(&input.name),
            name: input.name,
            description: input.description,
            price: input.price,
            discount_price: input.discount_price,
            category_id: input.category_id,
            images: input.images,
            thumbnail: input.thumbnail,
            in_stock: input.stock > 0,
            stock: input.stock,
            specifications: input.specifications,
            features: input.features,
            rating: 0.0,
            num_reviews: 0,
            status: input.status,
            featured: input.featured,
            video_url: input.video_url,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update in memory; rating fields are never touched.
    pub fn apply_update(&mut self, update: UpdateProduct) {
        self.discount_price = update.discount_after(self.discount_price);
        if let Some(name) = update.name {
            self.slug = slugify(&name);
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = Some(category_id);
        }
        if let Some(images) = update.images {
            self.images = images;
        }
        if let Some(thumbnail) = update.thumbnail {
            self.thumbnail = Some(thumbnail);
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
            self.in_stock = stock > 0;
        }
        if let Some(specifications) = update.specifications {
            self.specifications = specifications;
        }
        if let Some(features) = update.features {
            self.features = features;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        if let Some(video_url) = update.video_url {
            self.video_url = Some(video_url);
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    /// Price the customer pays, in cents.
    pub fn effective_price(&self) -> i64 {
        self.discount_price.unwrap_or(self.price)
    }
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            slug: slugify(&input.name),
            name: input.name,
            description: input.description,
            icon: input.icon,
            image_url: input.image_url,
            order: input.order,
            status: input.status,
            product_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateCategory) {
        if let Some(name) = update.name {
            self.slug = slugify(&name);
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(icon) = update.icon {
            self.icon = Some(icon);
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(order) = update.order {
            self.order = order;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}
