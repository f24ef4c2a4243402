//! Extractors that reject bad input with the standard [`ErrorResponse`](crate::ErrorResponse) body.

pub mod json_body;
pub mod uuid_path;
pub mod validated_json;

pub use json_body::JsonBody;
pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
