//! # Axum Helpers
//!
//! Shared building blocks for the storefront HTTP services.
//!
//! - **[`auth`]**: JWT verification middleware and the [`Caller`] extractor
//! - **[`server`]**: router assembly with OpenAPI docs, health checks, graceful shutdown
//! - **[`http`]**: security headers
//! - **[`errors`]**: [`AppError`] and the standard [`ErrorResponse`] body
//! - **[`extractors`]**: [`UuidPath`], [`ValidatedJson`] and [`JsonBody`]
//! - **[`pagination`]**: `?page=&limit=` parsing and the [`Paginated`] envelope

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod pagination;
pub mod server;

pub use auth::{
    ACCESS_TOKEN_TTL, Caller, JwtAuth, JwtClaims, JwtConfig, jwt_auth_middleware,
    optional_jwt_auth_middleware,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::security_headers;

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{JsonBody, UuidPath, ValidatedJson};

pub use pagination::{MAX_PAGE, MAX_PAGE_SIZE, Page, PageQuery, Paginated, PaginationMeta};
