use axum::BoxError;
use tower::timeout::error::Elapsed;

use crate::error::AppError;

/// Error handler for `tower::timeout::TimeoutLayer` behind an axum
/// `HandleErrorLayer`: elapsed deadlines become a 408 envelope, anything else
/// a 500.
pub async fn handle_timeout_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request exceeded its deadline");
        AppError::RequestTimeout
    } else {
        AppError::InternalError(anyhow::anyhow!("Unhandled middleware error: {}", err))
    }
}
