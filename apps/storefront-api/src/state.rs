//! Application state management

use std::sync::Arc;

use axum_helpers::JwtAuth;
use domain_messages::MongoMessageRepository;
use domain_products::{MongoCategoryRepository, MongoProductRepository};
use domain_reviews::{MongoReviewRepository, RepositoryCatalog};
use mongodb::Client;

/// Catalog view the review domain writes ratings through.
pub type Catalog = RepositoryCatalog<MongoProductRepository>;

/// Shared application state
///
/// Repositories are shared by every router so product, category and review
/// services see the same collections. Messages stand apart from the catalog.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub auth: JwtAuth,
    pub products: Arc<MongoProductRepository>,
    pub categories: Arc<MongoCategoryRepository>,
    pub reviews: Arc<MongoReviewRepository>,
    pub messages: Arc<MongoMessageRepository>,
}

impl AppState {
    pub fn new(config: crate::config::Config, mongo_client: Client) -> Self {
        let db = mongo_client.database(config.mongodb.database());
        let auth = JwtAuth::new(&config.jwt);

        Self {
            products: Arc::new(MongoProductRepository::new(&db)),
            categories: Arc::new(MongoCategoryRepository::new(&db)),
            reviews: Arc::new(MongoReviewRepository::new(&db)),
            messages: Arc::new(MongoMessageRepository::new(&db)),
            config,
            mongo_client,
            auth,
        }
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::new(RepositoryCatalog::new(Arc::clone(&self.products)))
    }
}
