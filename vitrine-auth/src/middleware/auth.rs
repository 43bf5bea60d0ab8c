use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::middleware::context::RequestAuthContext;
use crate::services::AuthError;
use crate::AppState;

/// Middleware to require authentication.
///
/// The `Authorization` header carries the raw token; a `Bearer ` prefix is
/// accepted and stripped. Missing or invalid tokens end the request with 401
/// and the next handler never runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = match req.headers().get(header::AUTHORIZATION) {
        None => return Err(AuthError::MissingToken),
        Some(value) => value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid Authorization header".to_string()))?,
    };

    let token = token.trim_start();
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    let token = token.to_string();

    let claims = state.tokens.validate_token(&token).await.map_err(|e| {
        tracing::info!(error = %e, "Rejected bearer token");
        AuthError::InvalidToken(e.to_string())
    })?;

    tracing::debug!(user_id = claims.user_id, "Request authenticated");

    // Scoped to this request: dropped together with it once the handler is done.
    req.extensions_mut()
        .insert(RequestAuthContext::new(token, claims));

    let mut response = next.run(req).await;

    response.extensions_mut().remove::<RequestAuthContext>();

    Ok(response)
}
