use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

pub const INVALID_ID: &str = "Invalid todo ID";

/// The `{id}` path segment parsed as an ObjectId. Any failure, including a
/// segment that is not valid UTF-8 once decoded, is a JSON 400
/// `Invalid todo ID`.
#[derive(Debug, Clone, Copy)]
pub struct TodoId(pub ObjectId);

impl TodoId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        ObjectId::parse_str(raw)
            .map(TodoId)
            .map_err(|_| AppError::bad_request(INVALID_ID))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TodoId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("Failed to extract todo id: {}", e);
                AppError::bad_request(INVALID_ID)
            })?;

        Self::parse(&raw)
    }
}
