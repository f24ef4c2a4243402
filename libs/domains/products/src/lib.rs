//! Products Domain
//!
//! Product catalog and categories on MongoDB.
//!
//! A product's `rating` and `num_reviews` are a denormalized summary of its
//! approved reviews. This crate stores them but never computes them: the
//! reviews domain writes them through [`ProductRepository::set_rating`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_products::{
//!     handlers, CategoryService, MongoCategoryRepository, MongoProductRepository,
//!     ProductService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("storefront");
//!
//! let products = Arc::new(MongoProductRepository::new(&db));
//! let categories = Arc::new(MongoCategoryRepository::new(&db));
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//!
//! let router = handlers::products::router(
//!     ProductService::new(products.clone(), categories.clone()),
//!     auth.clone(),
//! )
//! .merge(handlers::categories::router(
//!     CategoryService::new(categories, products),
//!     auth,
//! ));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::categories::ApiDoc as CategoriesApiDoc;
pub use handlers::products::ApiDoc as ProductsApiDoc;
pub use memory::{InMemoryCategoryRepository, InMemoryProductRepository};
pub use models::{
    Category, CategoryFilter, CategoryStatus, CreateCategory, CreateProduct, Product,
    ProductFilter, ProductImage, ProductStatus, Specification, UpdateCategory, UpdateProduct,
};
pub use crate::mongodb::{MongoCategoryRepository, MongoProductRepository};
pub use repository::{CategoryRepository, ProductRepository};
pub use service::{CategoryService, ProductService};
