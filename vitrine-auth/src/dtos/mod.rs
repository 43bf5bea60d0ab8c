pub mod auth;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error envelope, as written by `service_core::error::AppError`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = 401)]
    pub code: u16,
    #[schema(example = "Invalid email or password")]
    pub message: String,
}
