use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// JSON body parsed but not validated.
///
/// For inputs the service normalizes before checking them, e.g. trimming an
/// email. Parse failures answer with the standard error body like
/// [`ValidatedJson`](super::ValidatedJson).
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(data)| JsonBody(data))
            .map_err(|e| AppError::from(e).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::post, Router};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Note {
        email: String,
    }

    async fn echo(JsonBody(note): JsonBody<Note>) -> String {
        note.email
    }

    fn request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_body_is_passed_through_untouched() {
        let app = Router::new().route("/", post(echo));
        let response = app.oneshot(request(r#"{"email":" Ann@X.io "}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b" Ann@X.io ");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let app = Router::new().route("/", post(echo));
        let response = app.oneshot(request("{not json")).await.unwrap();

        assert!(response.status().is_client_error());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }
}
