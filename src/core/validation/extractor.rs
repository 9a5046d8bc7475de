//! Axum extractor for validated JSON bodies

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::error::{MarketError, ValidationError};

/// JSON body that has passed its `Validate` rules
///
/// ```rust,ignore
/// pub async fn register(
///     ValidatedJson(body): ValidatedJson<RegisterRequest>,
/// ) -> MarketResult<Json<User>> {
///     // body is deserialized and validated
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = MarketError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|e| {
            MarketError::Validation(ValidationError::InvalidJson {
                message: e.body_text(),
            })
        })?;

        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}
