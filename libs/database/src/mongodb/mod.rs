//! MongoDB connector and shared helpers
//!
//! Connection management, readiness probing and the serde/bson adapters used
//! by every domain repository.

mod config;
mod connector;
mod health;
pub mod uuid_as_string;
mod values;

pub use config::MongoConfig;
pub use connector::{connect, connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use values::{int_field, is_duplicate_key, DUPLICATE_KEY_CODE};

pub use mongodb::{Client, Collection, Database};
