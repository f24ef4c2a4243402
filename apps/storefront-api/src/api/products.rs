//! Products API routes

use std::sync::Arc;

use domain_products::{handlers, ProductService};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> axum::Router {
    let service = ProductService::new(Arc::clone(&state.products), Arc::clone(&state.categories));
    handlers::products::router(service, state.auth.clone())
}

/// Initialize products indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    state.products.init_indexes().await?;
    Ok(())
}
