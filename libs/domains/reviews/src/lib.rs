//! Reviews Domain
//!
//! Product reviews, their moderation, and the product rating derived from them.
//!
//! ```text
//!  create ──► pending ──approve──► approved ◄──┐
//!                │                    │        │
//!                └──────reject──────► rejected ┘ approve
//!
//!  any status ──delete──► removed
//! ```
//!
//! A product's `rating` and `num_reviews` always describe its approved
//! reviews. [`ReviewService`] persists each approve, reject or delete and then
//! asks the [`RatingAggregator`] to recompute the product from scratch. That
//! recompute is the only writer of those two fields.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_products::MongoProductRepository;
//! use domain_reviews::{handlers, MongoReviewRepository, RepositoryCatalog, ReviewService, RolePolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("storefront");
//!
//! let catalog = RepositoryCatalog::new(Arc::new(MongoProductRepository::new(&db)));
//! let service = ReviewService::new(
//!     Arc::new(MongoReviewRepository::new(&db)),
//!     Arc::new(catalog),
//!     Arc::new(RolePolicy::default()),
//! );
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//! let router = handlers::router(service, auth);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod catalog;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod policy;
pub mod repository;
pub mod service;

pub use aggregator::RatingAggregator;
pub use catalog::{ProductCatalog, RepositoryCatalog};
pub use error::{ReviewError, ReviewResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryReviewRepository;
pub use models::{
    CreateReview, RatingAggregate, RatingTotals, Review, ReviewFilter, ReviewStatus,
};
pub use crate::mongodb::MongoReviewRepository;
pub use policy::{ModerationPolicy, RolePolicy, DEFAULT_MODERATOR_ROLES};
pub use repository::ReviewRepository;
pub use service::ReviewService;
