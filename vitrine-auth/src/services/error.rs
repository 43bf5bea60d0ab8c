use service_core::error::AppError;
use thiserror::Error;

/// Message returned for both unknown emails and wrong passwords.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    MalformedRequest(String),

    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("No token provided")]
    MissingToken,

    #[error("{0}")]
    InvalidToken(String),

    #[error("Error while signing token: {0}")]
    TokenIssuance(anyhow::Error),

    #[error("Authentication context missing from request")]
    ContextMissing,

    #[error("Internal error: {0}")]
    Internal(anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MalformedRequest(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            AuthError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!(INVALID_CREDENTIALS_MESSAGE))
            }
            AuthError::MissingToken => AppError::Unauthorized(anyhow::anyhow!("No token provided")),
            AuthError::InvalidToken(msg) => AppError::Unauthorized(anyhow::anyhow!(msg)),
            AuthError::TokenIssuance(e) => {
                AppError::InternalError(e.context("Error while signing token"))
            }
            AuthError::ContextMissing => AppError::InternalError(anyhow::anyhow!(
                "Authentication context missing from request"
            )),
            AuthError::Internal(e) => AppError::InternalError(e),
        }
    }
}

impl service_core::axum::response::IntoResponse for AuthError {
    fn into_response(self) -> service_core::axum::response::Response {
        AppError::from(self).into_response()
    }
}
