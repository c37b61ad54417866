//! Request extraction that reports malformed input as `AppError::BadRequest`.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;

/// JSON body extractor. Undecodable bodies, including unknown enum names, become a 400 with the
/// standard error body instead of axum's plain-text rejection.
#[derive(Clone, Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let message = rejection.body_text();
                tracing::warn!(error = %message, "rejected request body");
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    return Err(AppError::PayloadTooLarge(message));
                }
                Err(AppError::BadRequest(message))
            }
        }
    }
}

/// Parse an integer id path segment.
pub fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}
