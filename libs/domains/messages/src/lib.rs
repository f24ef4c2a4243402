//! Messages Domain
//!
//! Contact-form messages and the staff inbox that works through them.
//!
//! Messages move `new -> read -> replied -> archived`, though staff may jump
//! to any status. `replied_at` and `archived_at` record the first time a
//! message reached those states.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_messages::{handlers, MessageService, MongoMessageRepository};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("storefront");
//!
//! let repository = Arc::new(MongoMessageRepository::new(&db));
//! repository.init_indexes().await?;
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-chars")?);
//! let router = handlers::router(MessageService::new(repository), auth);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{MessageError, MessageResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryMessageRepository;
pub use models::{
    CreateMessage, Message, MessageFilter, MessagePage, MessagePriority, MessageStatus,
    ReplyMessage, StatusCounts, UpdatePriority,
};
pub use crate::mongodb::MongoMessageRepository;
pub use repository::MessageRepository;
pub use service::{MessageService, MESSAGE_PAGE_SIZE};
