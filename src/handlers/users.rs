//! # User Handlers
//!
//! CRUD over the `users` table for authenticated admins.
//!
//! ## Authentication
//! Every route here sits behind `require_session`, `require_admin` and
//! `verify_csrf`, so handlers can rely on `SessionClaims` being present.

use crate::auth::password::hash_password;
use crate::auth::session::SessionClaims;
use crate::db::models::{NewUser, User, UserPage};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::handlers::types::{
    CreateUserRequest, DeleteManyRequest, ListUsersParams, UpdateUserRequest,
};
use crate::state::AppState;
use crate::validation::{validate_create, validate_update};
use crate::handlers::extract::{JsonBody, PathParam, QueryParams};
use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

/// List users with search, sort and pagination
///
/// ## Route
/// GET /api/users?page=1&limit=10&sort=username&order=asc&search=ann
///
/// ## Response
/// ```json
/// { "users": [...], "total": 42, "page": 1, "totalPages": 5 }
/// ```
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListUsersParams>,
) -> AppResult<Json<UserPage>> {
    let query = params.resolve();
    let page = users::list_users(&state.db, &query).await?;

    Ok(Json(page))
}

/// Fetch one user
///
/// ## Route
/// GET /api/users/{id}
///
/// ## Errors
/// - 400 if `id` is not an integer
/// - 404 if no such user
pub async fn get_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
) -> AppResult<Json<User>> {
    let user = users::find_by_id(&state.db, user_id).await?;
    Ok(Json(user))
}

/// Create a user
///
/// ## Route
/// POST /api/users
///
/// ## Errors
/// - 400 with every validation message
/// - 409 if the username is taken
pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let valid = validate_create(req)?;

    // Checked before hashing to fail fast; the UNIQUE constraint covers races
    if users::username_exists(&state.db, &valid.username).await? {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let password_hash = hash_password(valid.password, state.bcrypt_cost).await?;
    let user = users::create_user(
        &state.db,
        &NewUser {
            username: valid.username,
            password_hash,
            first_name: valid.first_name,
            last_name: valid.last_name,
            gender: valid.gender,
            birthdate: valid.birthdate,
            is_admin: valid.is_admin,
        },
    )
    .await?;

    tracing::info!("{} created user '{}' (id {})", claims.username, user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user": user,
        })),
    ))
}

/// Partially update a user
///
/// ## Route
/// PUT /api/users/{id}
///
/// Only keys present in the body change; `null` clears a nullable field.
/// A non-empty `password` is rehashed, an empty one ignored.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    PathParam(user_id): PathParam<i64>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<Value>> {
    let valid = validate_update(req)?;
    if valid.is_empty() {
        return Err(AppError::BadRequest("No data to update".to_string()));
    }

    let mut patch = valid.patch;
    if let Some(password) = valid.password {
        patch.password_hash = Some(hash_password(password, state.bcrypt_cost).await?);
    }

    let user = users::update_user(&state.db, user_id, &patch).await?;

    tracing::info!("{} updated user '{}' (id {})", claims.username, user.username, user.id);

    Ok(Json(json!({
        "message": "User updated successfully",
        "user": user,
    })))
}

/// Delete one user
///
/// ## Route
/// DELETE /api/users/{id}
///
/// ## Errors
/// - 400 if `id` is the caller's own account
/// - 404 if no such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    PathParam(user_id): PathParam<i64>,
) -> AppResult<Json<Value>> {
    if user_id == claims.id {
        return Err(AppError::BadRequest("You cannot delete yourself".to_string()));
    }

    if !users::delete_user(&state.db, user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("{} deleted user id {}", claims.username, user_id);

    Ok(Json(json!({ "message": "User deleted successfully" })))
}

/// Delete several users at once
///
/// ## Route
/// POST /api/users/delete-multiple
///
/// ## Request
/// ```json
/// { "ids": [3, "4", 5] }
/// ```
///
/// The caller's own id is dropped from the batch rather than failing it.
pub async fn delete_multiple_users(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    JsonBody(req): JsonBody<DeleteManyRequest>,
) -> AppResult<Json<Value>> {
    let raw = req.ids.unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::BadRequest("IDs array is required".to_string()));
    }

    let ids = raw
        .iter()
        .map(|id| id.as_i64())
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(|| AppError::BadRequest("IDs must be integers".to_string()))?;

    let safe_ids: Vec<i64> = ids.into_iter().filter(|id| *id != claims.id).collect();
    if safe_ids.is_empty() {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let deleted = users::delete_users(&state.db, &safe_ids).await?;

    tracing::info!("{} deleted {} users", claims.username, deleted);

    Ok(Json(json!({
        "message": "Selected users deleted successfully",
        "deleted": deleted,
    })))
}
