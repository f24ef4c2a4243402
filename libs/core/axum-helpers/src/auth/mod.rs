//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs signed by the account service with the shared
//! `JWT_SECRET`. This crate only verifies them; the verified claims are put in
//! request extensions where [`Caller`] picks them up.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let admin = Router::new()
//!     .route("/", post(create_product))
//!     .layer(axum::middleware::from_fn_with_state(auth.clone(), jwt_auth_middleware));
//!
//! let public = Router::new()
//!     .route("/", get(list_reviews))
//!     .layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//! ```

pub mod caller;
pub mod config;
pub mod jwt;
pub mod middleware;

pub use caller::Caller;
pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::{jwt_auth_middleware, optional_jwt_auth_middleware};
