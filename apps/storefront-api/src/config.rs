//! Configuration for the Storefront API

use axum_helpers::JwtConfig;
use core_config::{app_info, env_list_or, env_parse_or, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;
use domain_reviews::DEFAULT_MODERATOR_ROLES;

pub use core_config::Environment;

/// Application configuration
///
/// Environment variables beyond the shared MongoDB/server/JWT ones:
/// - `MODERATOR_ROLES`: comma separated roles allowed to moderate reviews
///   (default `admin,superadmin,moderator`)
/// - `BACKFILL_RATINGS_ON_START`: recompute every product rating at startup (default `false`)
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub moderator_roles: Vec<String>,
    pub backfill_ratings_on_start: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name("storefront-api");
        }
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;

        let moderator_roles = env_list_or("MODERATOR_ROLES", DEFAULT_MODERATOR_ROLES);
        let backfill_ratings_on_start = env_parse_or("BACKFILL_RATINGS_ON_START", false)?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            jwt,
            moderator_roles,
            backfill_ratings_on_start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "storefront-config-test-secret-32-chars";
    const MONGO_URL: &str = "mongodb://localhost:27017";

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("MONGODB_URL", Some(MONGO_URL)),
                ("MONGODB_DATABASE", Some("storefront")),
                ("MODERATOR_ROLES", None),
                ("BACKFILL_RATINGS_ON_START", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.moderator_roles, ["admin", "superadmin", "moderator"]);
                assert!(!config.backfill_ratings_on_start);
                assert_eq!(config.app.name, "storefront_api");
                assert_eq!(config.mongodb.app_name.as_deref(), Some("storefront-api"));
            },
        );
    }

    #[test]
    fn test_custom_roles_and_backfill() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("MONGODB_URL", Some(MONGO_URL)),
                ("MONGODB_DATABASE", Some("storefront")),
                ("MODERATOR_ROLES", Some("support, admin")),
                ("BACKFILL_RATINGS_ON_START", Some("true")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.moderator_roles, ["support", "admin"]);
                assert!(config.backfill_ratings_on_start);
            },
        );
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", None),
                ("MONGODB_URL", Some(MONGO_URL)),
                ("MONGODB_DATABASE", Some("storefront")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_invalid_backfill_flag_fails() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("MONGODB_URL", Some(MONGO_URL)),
                ("MONGODB_DATABASE", Some("storefront")),
                ("BACKFILL_RATINGS_ON_START", Some("sometimes")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
