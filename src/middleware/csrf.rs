use crate::auth::cookies::CSRF_COOKIE;
use crate::auth::csrf::{tokens_match, CSRF_HEADER};
use crate::error::{AppError, AppResult};
use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use axum_extra::extract::cookie::CookieJar;

/// Double-submit check for every method except GET, HEAD and OPTIONS.
pub async fn verify_csrf(jar: CookieJar, request: Request, next: Next) -> AppResult<Response> {
    let safe = matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS);

    if !safe {
        let presented = request
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let expected = jar.get(CSRF_COOKIE).map(|c| c.value()).unwrap_or_default();

        if !tokens_match(presented, expected) {
            tracing::warn!("CSRF check failed for {} {}", request.method(), request.uri().path());
            return Err(AppError::InvalidCsrf);
        }
    }

    Ok(next.run(request).await)
}
