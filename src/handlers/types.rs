//! # API Types
//!
//! Request bodies and query strings accepted by the handlers. These are
//! raw client input: every string is sanitized and validated (see
//! `crate::validation`) before it reaches the store.

use crate::db::models::{SortField, SortOrder, UserListQuery};
use serde::{Deserialize, Deserializer};

/// Request to log in
///
/// ## Example JSON
/// ```json
/// { "username": "admin", "password": "s3cret-pass" }
/// ```
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `true`/`false`, also accepted as the strings `"true"`/`"false"`
/// (HTML forms send strings)
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BoolFlag {
    Bool(bool),
    Text(String),
}

impl BoolFlag {
    pub fn is_true(&self) -> bool {
        match self {
            BoolFlag::Bool(b) => *b,
            BoolFlag::Text(s) => s == "true",
        }
    }
}

/// A user id sent as a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdValue {
    Int(i64),
    Text(String),
}

impl IdValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IdValue::Int(id) => Some(*id),
            IdValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Body of `POST /api/users`
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<String>,
    pub is_admin: Option<BoolFlag>,
}

/// Body of `PUT /api/users/{id}`
///
/// The outer `Option` records whether a key was present at all; the inner
/// one whether it was `null`. Absent keys are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "present")]
    pub username: Option<Option<String>>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub birthdate: Option<Option<String>>,
    #[serde(default)]
    pub is_admin: Option<BoolFlag>,
}

// Only called when the key exists, so `null` becomes `Some(None)`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/users/delete-multiple`
#[derive(Debug, Deserialize)]
pub struct DeleteManyRequest {
    #[serde(default)]
    pub ids: Option<Vec<IdValue>>,
}

/// Query string of `GET /api/users`
///
/// Kept as strings so malformed values fall back to defaults instead of
/// failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

impl ListUsersParams {
    pub fn resolve(&self) -> UserListQuery {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .map(|l| l.min(UserListQuery::MAX_LIMIT))
            .unwrap_or(UserListQuery::DEFAULT_LIMIT);

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        UserListQuery {
            page,
            limit,
            sort: self.sort.as_deref().map(SortField::parse).unwrap_or_default(),
            order: self.order.as_deref().map(SortOrder::parse).unwrap_or_default(),
            search,
        }
    }
}
