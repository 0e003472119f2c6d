//! # Database Models
//!
//! Data structures that map to the `users` table, plus the value types used
//! to describe inserts, partial updates and listing queries.
//!
//! ## Key Concepts
//! - [`User`] is the public projection: it never carries the password hash.
//! - [`UserRecord`] is the login-only view that does.
//! - [`NewUser`] and [`UserPatch`] are already validated and hashed; the
//!   store layer does no checking of its own beyond the table constraints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Allowed values for the optional `gender` column
///
/// Stored as text and serialized in kebab-case, e.g. `"prefer-not-to-say"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    NonBinary,
    PreferNotToSay,
}

impl Gender {
    pub const ALL: [Gender; 5] = [
        Gender::Male,
        Gender::Female,
        Gender::Other,
        Gender::NonBinary,
        Gender::PreferNotToSay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::NonBinary => "non-binary",
            Gender::PreferNotToSay => "prefer-not-to-say",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == value)
    }
}

/// User as returned to clients
///
/// ## Derive Macros
/// - `Serialize`: JSON responses
/// - `sqlx::FromRow`: maps the selected columns of `users` onto this struct
///
/// `birthdate` serializes as `"YYYY-MM-DD"`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birthdate: Option<NaiveDate>,
    pub is_admin: bool,
}

/// Columns selected for every [`User`] projection
pub const USER_COLUMNS: &str = "id, username, first_name, last_name, gender, birthdate, is_admin";

/// The subset of a user row needed to check a login
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// bcrypt hash
    pub password: String,
    pub is_admin: bool,
}

/// A validated user ready to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birthdate: Option<NaiveDate>,
    pub is_admin: bool,
}

/// A set of optional field changes for one user
///
/// `None` leaves the column untouched. For nullable columns the inner
/// `Option` is the new value, so `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub gender: Option<Option<Gender>>,
    pub birthdate: Option<Option<NaiveDate>>,
    pub is_admin: Option<bool>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password_hash.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.gender.is_none()
            && self.birthdate.is_none()
            && self.is_admin.is_none()
    }
}

/// Columns a listing may be ordered by
///
/// Column names in `ORDER BY` come from here, never from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    #[default]
    Username,
    FirstName,
    LastName,
    Birthdate,
}

impl SortField {
    /// Unknown values fall back to `username`
    pub fn parse(value: &str) -> Self {
        match value {
            "id" => SortField::Id,
            "username" => SortField::Username,
            "first_name" => SortField::FirstName,
            "last_name" => SortField::LastName,
            "birthdate" => SortField::Birthdate,
            _ => SortField::Username,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Username => "username",
            SortField::FirstName => "first_name",
            SortField::LastName => "last_name",
            SortField::Birthdate => "birthdate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only `desc` (any case) means descending
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// A resolved listing request
#[derive(Debug, Clone, PartialEq)]
pub struct UserListQuery {
    /// 1-based
    pub page: i64,
    pub limit: i64,
    pub sort: SortField,
    pub order: SortOrder,
    /// Trimmed; `None` means no filter
    pub search: Option<String>,
}

impl UserListQuery {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    /// Rows skipped before this page; saturates, so a page far past the
    /// end simply selects nothing.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
            sort: SortField::default(),
            order: SortOrder::default(),
            search: None,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl UserPage {
    pub fn total_pages(total: i64, limit: i64) -> i64 {
        if limit <= 0 {
            return 0;
        }
        (total + limit - 1) / limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_round_trips_through_its_text_form() {
        for gender in Gender::ALL {
            assert_eq!(Gender::parse(gender.as_str()), Some(gender));
            let json = serde_json::to_string(&gender).unwrap();
            assert_eq!(json, format!("\"{}\"", gender.as_str()));
        }
        assert_eq!(Gender::parse("Male"), None);
        assert_eq!(Gender::parse("robot"), None);
    }

    #[test]
    fn test_sort_field_fallback() {
        assert_eq!(SortField::parse("birthdate"), SortField::Birthdate);
        assert_eq!(SortField::parse("password"), SortField::Username);
        assert_eq!(SortField::parse("id; DROP TABLE users"), SortField::Username);
    }

    #[test]
    fn test_sort_order_fallback() {
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Asc);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(UserPage::total_pages(0, 10), 0);
        assert_eq!(UserPage::total_pages(10, 10), 1);
        assert_eq!(UserPage::total_pages(11, 10), 2);
    }

    #[test]
    fn test_offset() {
        let query = UserListQuery {
            page: 3,
            limit: 25,
            ..Default::default()
        };
        assert_eq!(query.offset(), 50);

        let far = UserListQuery {
            page: i64::MAX,
            limit: UserListQuery::MAX_LIMIT,
            ..Default::default()
        };
        assert_eq!(far.offset(), i64::MAX);
    }

    #[test]
    fn test_empty_patch() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            first_name: Some(None),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_user_serialization_has_no_password() {
        let user = User {
            id: 1,
            username: "alice".into(),
            first_name: None,
            last_name: Some("Liddell".into()),
            gender: Some(Gender::NonBinary),
            birthdate: NaiveDate::from_ymd_opt(1990, 5, 17),
            is_admin: false,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["gender"], "non-binary");
        assert_eq!(json["birthdate"], "1990-05-17");
    }
}
