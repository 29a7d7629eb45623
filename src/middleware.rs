//! Authentication Middleware
//!
//! Bearer-token validation against the service's signer.

use crate::error::AuthError;
use crate::handlers::AuthState;
use crate::models::TokenClaims;
use crate::service::AuthService;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Extract and validate the bearer token from an Authorization header value
fn validate_bearer(auth: &AuthService, header: Option<&str>) -> Result<TokenClaims, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)?;

    auth.validate_token(token).map_err(|e| {
        tracing::debug!("Token validation failed: {}", e);
        e
    })
}

/// Require authenticated user
///
/// Validates the token from the Authorization header and stores the claims
/// in request extensions for [`AuthUser`](crate::extractors::AuthUser).
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let claims = validate_bearer(&auth, auth_header)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
