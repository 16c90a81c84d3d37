use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use service_core::error::AppError;

/// `Query` whose rejections (duplicate or undecodable keys) are answered with
/// the JSON error body instead of axum's plain-text one.
#[derive(Debug, Clone)]
pub struct CatalogQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for CatalogQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;
        Ok(Self(value))
    }
}
