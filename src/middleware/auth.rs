//! # Session Middleware
//!
//! `require_session` turns the session cookie into [`SessionClaims`] in the
//! request extensions; handlers read them with `Extension<SessionClaims>`.

use crate::auth::cookies::SESSION_COOKIE;
use crate::auth::session::{Role, SessionClaims};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

/// Reject requests without a valid session cookie
///
/// ## Errors
/// - `Unauthenticated` (401) if the cookie is missing or empty
/// - `InvalidSession` (401) if the token is forged, malformed or expired
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("No token provided".to_string()))?;

    let claims = state.sessions.verify(&token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Reject sessions without the admin role (403)
///
/// Must run after `require_session`.
pub async fn require_admin(request: Request, next: Next) -> AppResult<Response> {
    let claims = request
        .extensions()
        .get::<SessionClaims>()
        .ok_or_else(|| AppError::Unauthenticated("Not authenticated".to_string()))?;

    if claims.role != Role::Admin {
        tracing::warn!("User {} denied admin route", claims.username);
        return Err(AppError::Forbidden("Admin privileges required".to_string()));
    }

    Ok(next.run(request).await)
}
