//! Reviews API routes

use std::sync::Arc;

use domain_reviews::{handlers, MongoReviewRepository, ReviewService, RolePolicy};

use crate::state::{AppState, Catalog};

/// Review service wired to the shared repositories and the configured moderator roles.
pub fn service(state: &AppState) -> ReviewService<MongoReviewRepository, Catalog> {
    let policy = RolePolicy::new(state.config.moderator_roles.iter().cloned());
    ReviewService::new(Arc::clone(&state.reviews), state.catalog(), Arc::new(policy))
}

/// Create reviews router
pub fn router(state: &AppState) -> axum::Router {
    handlers::router(service(state), state.auth.clone())
}

/// Initialize reviews indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    state.reviews.init_indexes().await?;
    Ok(())
}
