use service_core::axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    dtos::{
        auth::{LoginRequest, LoginResponse, SessionResponse},
        ErrorResponse,
    },
    middleware::Authenticated,
    services::AuthError,
    utils::ValidatedJson,
    AppState,
};

/// Login with organization email and password
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Token could not be signed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let res = state.auth_service.login(req).await?;
    Ok((StatusCode::OK, Json(res)))
}

/// Identity and permissions of the presented token
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn session(Authenticated(ctx): Authenticated) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: ctx.user_id(),
        permissions: ctx.permissions().iter().map(str::to_string).collect(),
    })
}
