use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_products::ProductError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("{email} has already reviewed product {product_id}")]
    DuplicateReview { product_id: Uuid, email: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid review: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type ReviewResult<T> = Result<T, ReviewError>;

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(id) => AppError::NotFound(format!("Review {} not found", id)),
            ReviewError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            ReviewError::DuplicateReview { .. } => {
                AppError::Conflict("You have already reviewed this product".to_string())
            }
            ReviewError::Validation(msg) => AppError::BadRequest(msg),
            ReviewError::InvalidInput(errors) => AppError::ValidationError(errors),
            ReviewError::Forbidden(msg) => AppError::Forbidden(msg),
            ReviewError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ReviewError {
    fn from(err: mongodb::error::Error) -> Self {
        ReviewError::Database(err.to_string())
    }
}

impl From<ProductError> for ReviewError {
    fn from(err: ProductError) -> Self {
        ReviewError::Database(err.to_string())
    }
}
