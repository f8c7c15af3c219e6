use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::response::ApiError;

/// Authenticated user id, placed in request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// Rejects the request with 401 unless it carries a valid access token.
pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header"))?;

    let claims = keys.verify_access(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(AuthUser(claims.sub));
    Ok(next.run(req).await)
}
