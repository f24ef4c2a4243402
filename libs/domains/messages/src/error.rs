use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Message not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid message: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type MessageResult<T> = Result<T, MessageError>;

impl From<MessageError> for AppError {
    fn from(err: MessageError) -> Self {
        match err {
            MessageError::NotFound(id) => AppError::NotFound(format!("Message {} not found", id)),
            MessageError::InvalidInput(errors) => AppError::ValidationError(errors),
            MessageError::Database(msg) => AppError::Database(msg),
            MessageError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for MessageError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for MessageError {
    fn from(err: mongodb::error::Error) -> Self {
        MessageError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for MessageError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        MessageError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MessageError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                MessageError::InvalidInput(validator::ValidationErrors::new()),
                StatusCode::BAD_REQUEST,
            ),
            (MessageError::Database("down".into()), StatusCode::BAD_GATEWAY),
            (MessageError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
