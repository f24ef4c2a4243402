//! API routes module

pub mod categories;
pub mod health;
pub mod messages;
pub mod products;
pub mod reviews;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/products", products::router(state))
        .nest("/categories", categories::router(state))
        .nest("/reviews", reviews::router(state))
        .nest("/messages", messages::router(state))
        .merge(health::router(state.clone()))
}

/// Initialize database indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    products::init_indexes(state).await?;
    categories::init_indexes(state).await?;
    reviews::init_indexes(state).await?;
    messages::init_indexes(state).await
}
