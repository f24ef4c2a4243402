//! Messages API routes

use std::sync::Arc;

use domain_messages::{handlers, MessageService};

use crate::state::AppState;

/// Create messages router
pub fn router(state: &AppState) -> axum::Router {
    handlers::router(
        MessageService::new(Arc::clone(&state.messages)),
        state.auth.clone(),
    )
}

/// Initialize messages indexes
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    state.messages.init_indexes().await?;
    Ok(())
}
