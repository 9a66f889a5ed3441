use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use service_core::error::AppError;

pub const INVALID_PAYLOAD: &str = "Invalid request payload";

/// JSON body extractor that decodes regardless of `Content-Type` and turns
/// every read or decode failure into a 400 `Invalid request payload`. A
/// `null` body decodes to `T::default()`.
#[derive(Debug, Clone)]
pub struct JsonPayload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Failed to read request body: {}", e);
            AppError::bad_request(INVALID_PAYLOAD)
        })?;

        serde_json::from_slice::<Option<T>>(&bytes)
            .map(|value| JsonPayload(value.unwrap_or_default()))
            .map_err(|e| {
                tracing::debug!("Failed to decode request body: {}", e);
                AppError::bad_request(INVALID_PAYLOAD)
            })
    }
}
