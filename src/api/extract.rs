//! Request extractors.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has already passed its `validator` rules.
///
/// Malformed bodies and failed validations are both rejected as
/// [`AppError::Validation`], so clients always get the JSON error shape.
///
/// ```rust,ignore
/// pub async fn create(
///     ValidatedJson(payload): ValidatedJson<LinkRequest>,
/// ) -> Result<Json<Link>, AppError> { ... }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}
