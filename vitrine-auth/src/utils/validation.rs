use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::services::AuthError;

/// JSON body extractor that also runs `validator` rules. Any failure is a
/// malformed request, rejected before the handler runs.
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AuthError::MalformedRequest(format!("Json parse error: {}", e.body_text())))?;

        value
            .validate()
            .map_err(|e| AuthError::MalformedRequest(format!("Validation error: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}
