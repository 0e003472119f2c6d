//! # Router
//!
//! Assembles the routes and the middleware stack. Kept apart from `main`
//! so tests can drive the exact same router in-process.
//!
//! ## Layer Order
//! Axum runs the most recently added layer first. On the user routes the
//! request therefore passes `require_session`, then `require_admin`, then
//! `verify_csrf` before reaching a handler. `route_layer` keeps unmatched
//! paths (404) from being reported as 401.

use crate::handlers::auth::{check_auth, login, logout};
use crate::handlers::health::health_check;
use crate::handlers::users::{
    create_user, delete_multiple_users, delete_user, get_user, list_users, update_user,
};
use crate::middleware::auth::{require_admin, require_session};
use crate::middleware::csrf::verify_csrf;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' data:; connect-src 'self'";

pub fn router(state: AppState, static_dir: &str) -> Router {
    // Session only: the frontend calls this to decide which page to show
    let session_routes = Router::new()
        .route("/api/auth/check", get(check_auth))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // Session + admin role + CSRF on mutating methods
    let user_routes = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/delete-multiple", post(delete_multiple_users))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(axum_middleware::from_fn(verify_csrf))
        .route_layer(axum_middleware::from_fn(require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .merge(session_routes)
        .merge(user_routes)
        // Serve the admin frontend (index.html, admin.html, js/...)
        .fallback_service(ServeDir::new(static_dir))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
