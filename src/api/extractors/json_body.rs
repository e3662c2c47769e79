//! JSON body extractor that ignores the request's `Content-Type`.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Decodes the raw request body as JSON.
///
/// Unlike `axum::Json` this does not require `Content-Type: application/json`,
/// and bytes after the first JSON value are ignored. Any read or decode
/// failure is rejected as [`AppError::BadRequest`].
///
/// # Example
///
/// ```rust,ignore
/// use user_registry::api::extractors::JsonBody;
/// use user_registry::domain::NewUser;
///
/// async fn create_user(JsonBody(payload): JsonBody<NewUser>) {
///     // payload is fully decoded
/// }
/// ```
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        decode_first(&bytes).map(JsonBody)
    }
}

/// Decode the first JSON value in `bytes`; whatever follows it is ignored.
fn decode_first<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    serde_json::Deserializer::from_slice(bytes)
        .into_iter::<T>()
        .next()
        .unwrap_or_else(|| Err(serde::de::Error::custom("EOF")))
        .map_err(|e| AppError::bad_request(e.to_string()))
}
