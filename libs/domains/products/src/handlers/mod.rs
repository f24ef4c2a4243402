//! HTTP handlers for the catalog
//!
//! Reads are public. Writes sit behind [`jwt_auth_middleware`](axum_helpers::jwt_auth_middleware).

pub mod categories;
pub mod products;
