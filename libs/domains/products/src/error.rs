use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Slug '{0}' is already taken")]
    DuplicateSlug(String),

    #[error("Category {id} still has {count} products")]
    CategoryInUse { id: Uuid, count: u64 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn category_not_found(id: Uuid) -> Self {
        Self::CategoryNotFound(id.to_string())
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(key) => AppError::NotFound(format!("Product {} not found", key)),
            ProductError::CategoryNotFound(key) => {
                AppError::NotFound(format!("Category {} not found", key))
            }
            ProductError::DuplicateSlug(slug) => {
                AppError::Conflict(format!("Slug '{}' is already taken", slug))
            }
            ProductError::CategoryInUse { id, count } => AppError::BadRequest(format!(
                "Category {} still has {} products and cannot be deleted",
                id, count
            )),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Database(msg) => AppError::Database(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl ProductError {
    /// Maps a unique-index violation on `slug` to [`ProductError::DuplicateSlug`].
    pub(crate) fn from_write(err: mongodb::error::Error, slug: &str) -> Self {
        if database::mongodb::is_duplicate_key(&err) {
            ProductError::DuplicateSlug(slug.to_string())
        } else {
            err.into()
        }
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ProductError::not_found(Uuid::nil()), StatusCode::NOT_FOUND),
            (ProductError::DuplicateSlug("lamp".into()), StatusCode::CONFLICT),
            (
                ProductError::CategoryInUse {
                    id: Uuid::nil(),
                    count: 2,
                },
                StatusCode::BAD_REQUEST,
            ),
            (ProductError::Validation("bad".into()), StatusCode::BAD_REQUEST),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
