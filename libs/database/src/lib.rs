//! Storage plumbing for the storefront services.
//!
//! Everything here is store-agnostic except the [`mongodb`] module, which owns
//! connection setup, readiness probing and the small serde/bson adapters the
//! domain crates share.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector, health check and helpers
//! - `config` - `core_config::FromEnv` for [`mongodb::MongoConfig`]
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{connect_from_config_with_retry, MongoConfig};
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
