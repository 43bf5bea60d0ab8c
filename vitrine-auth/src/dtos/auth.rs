use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::BaseOrganization;

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "contato@instituto.org")]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret")]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub organization: BaseOrganization,
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Identity attached to the current request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    #[schema(example = 1)]
    pub user_id: i64,
    #[schema(example = json!(["edit"]))]
    pub permissions: Vec<String>,
}
