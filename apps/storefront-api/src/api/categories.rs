//! Categories API routes

use std::sync::Arc;

use domain_products::{handlers, CategoryService};

use crate::state::AppState;

pub fn router(state: &AppState) -> axum::Router {
    let service =
        CategoryService::new(Arc::clone(&state.categories), Arc::clone(&state.products));
    handlers::categories::router(service, state.auth.clone())
}

pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    state.categories.init_indexes().await?;
    Ok(())
}
