use crate::auth::cookies::CSRF_COOKIE;
use crate::auth::csrf;
use crate::auth::password::verify_password;
use crate::auth::session::{Role, SessionClaims, SessionUser};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::handlers::extract::JsonBody;
use crate::handlers::types::LoginRequest;
use crate::state::AppState;
use axum::{extract::State, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<(CookieJar, Json<Value>)> {
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    // Unknown user, wrong password and non-admin all look the same to the client
    let invalid = || AppError::Unauthenticated("Invalid credentials".to_string());

    let record = users::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(password, record.password.clone()).await? || !record.is_admin {
        tracing::info!("Rejected login for '{}'", username);
        return Err(invalid());
    }

    let token = state.sessions.issue(record.id, &record.username, Role::Admin)?;
    let jar = jar
        .add(state.cookies.session_cookie(token))
        .add(state.cookies.csrf_cookie(csrf::generate_token()));

    tracing::info!("Admin '{}' logged in", record.username);

    let user = SessionUser {
        id: record.id,
        username: record.username,
        role: Role::Admin,
    };

    Ok((
        jar,
        Json(json!({
            "message": "Login successful",
            "user": user,
        })),
    ))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        state.cookies.clear(jar),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// Behind `require_session`. Re-issues the CSRF cookie if the browser lost it.
pub async fn check_auth(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    let jar = if jar.get(CSRF_COOKIE).is_none() {
        jar.add(state.cookies.csrf_cookie(csrf::generate_token()))
    } else {
        jar
    };

    (
        jar,
        Json(json!({
            "isAuthenticated": true,
            "user": SessionUser::from(&claims),
        })),
    )
}
