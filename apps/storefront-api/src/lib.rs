//! Storefront API
//!
//! Catalog, reviews and contact inbox served over one MongoDB database.
//! The default binary serves the REST API; `storefront-seed` loads demo data.

pub mod api;
pub mod config;
pub mod openapi;
pub mod seed;
pub mod state;
