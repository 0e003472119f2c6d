//! # Input Sanitation & Validation
//!
//! Turns raw user-form input into values the store can take.
//!
//! Every string field except the password is sanitized first: control
//! characters (U+0000–U+001F, U+007F) and angle brackets are removed and
//! surrounding whitespace trimmed. The password is left byte-for-byte as
//! typed, since login compares it unsanitized.
//!
//! Validation collects every problem instead of stopping at the first, and
//! reports them together as [`AppError::Validation`].

use crate::db::models::{Gender, UserPatch};
use crate::error::{AppError, AppResult};
use crate::handlers::types::{CreateUserRequest, UpdateUserRequest};
use chrono::NaiveDate;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 8;

/// A create request that passed validation; the password is still plain
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCreate {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birthdate: Option<NaiveDate>,
    pub is_admin: bool,
}

/// An update that passed validation
///
/// `patch.password_hash` is always `None` here; the handler hashes
/// `password` and fills it in.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidUpdate {
    pub patch: UserPatch,
    pub password: Option<String>,
}

impl ValidUpdate {
    pub fn is_empty(&self) -> bool {
        self.patch.is_empty() && self.password.is_none()
    }
}

pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '\u{0}'..='\u{1F}' | '\u{7F}' | '<' | '>'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitized text, with empty mapped to `None`
fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(sanitize).filter(|v| !v.is_empty())
}

fn check_username(username: &str, errors: &mut Vec<String>) {
    let len = username.chars().count();
    if len == 0 {
        errors.push("Username is required".to_string());
    } else if len < USERNAME_MIN {
        errors.push(format!("Username must be at least {} characters", USERNAME_MIN));
    } else if len > USERNAME_MAX {
        errors.push(format!("Username cannot exceed {} characters", USERNAME_MAX));
    }
}

fn check_password_length(password: &str, errors: &mut Vec<String>) {
    if password.chars().count() < PASSWORD_MIN {
        errors.push(format!("Password must be at least {} characters", PASSWORD_MIN));
    }
}

fn parse_gender(raw: Option<&str>, errors: &mut Vec<String>) -> Option<Gender> {
    let value = optional_text(raw)?;
    match Gender::parse(&value) {
        Some(gender) => Some(gender),
        None => {
            let allowed: Vec<&str> = Gender::ALL.iter().map(Gender::as_str).collect();
            errors.push(format!("Gender must be one of: {}", allowed.join(", ")));
            None
        }
    }
}

fn parse_birthdate(raw: Option<&str>, errors: &mut Vec<String>) -> Option<NaiveDate> {
    let value = optional_text(raw)?;
    match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push("Birthdate must be a valid date (YYYY-MM-DD)".to_string());
            None
        }
    }
}

pub fn validate_create(req: CreateUserRequest) -> AppResult<ValidCreate> {
    let mut errors = Vec::new();

    let username = req.username.as_deref().map(sanitize).unwrap_or_default();
    check_username(&username, &mut errors);

    let password = req.password.unwrap_or_default();
    if password.trim().is_empty() {
        errors.push("Password is required".to_string());
    } else {
        check_password_length(&password, &mut errors);
    }

    let gender = parse_gender(req.gender.as_deref(), &mut errors);
    let birthdate = parse_birthdate(req.birthdate.as_deref(), &mut errors);

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(ValidCreate {
        username,
        password,
        first_name: optional_text(req.first_name.as_deref()),
        last_name: optional_text(req.last_name.as_deref()),
        gender,
        birthdate,
        is_admin: req.is_admin.map(|f| f.is_true()).unwrap_or(false),
    })
}

pub fn validate_update(req: UpdateUserRequest) -> AppResult<ValidUpdate> {
    let mut errors = Vec::new();
    let mut patch = UserPatch::default();

    if let Some(raw) = req.username {
        let username = raw.as_deref().map(sanitize).unwrap_or_default();
        check_username(&username, &mut errors);
        patch.username = Some(username);
    }

    // An empty password means "keep the current one".
    let password = req.password.filter(|p| !p.is_empty());
    if let Some(p) = &password {
        check_password_length(p, &mut errors);
    }

    if let Some(raw) = req.first_name {
        patch.first_name = Some(optional_text(raw.as_deref()));
    }
    if let Some(raw) = req.last_name {
        patch.last_name = Some(optional_text(raw.as_deref()));
    }
    if let Some(raw) = req.gender {
        patch.gender = Some(parse_gender(raw.as_deref(), &mut errors));
    }
    if let Some(raw) = req.birthdate {
        patch.birthdate = Some(parse_birthdate(raw.as_deref(), &mut errors));
    }
    patch.is_admin = req.is_admin.map(|f| f.is_true());

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(ValidUpdate { patch, password })
}
