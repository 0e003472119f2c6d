//! Queries over the `users` table
//!
//! Plain async functions taking the pool. Values arrive already validated
//! and hashed; the only checks here are the table's own constraints.

use crate::db::models::{
    NewUser, User, UserListQuery, UserPage, UserPatch, UserRecord, USER_COLUMNS,
};
use crate::error::{AppError, AppResult};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

fn conflict_on_unique(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Username already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Login lookup; the only query that reads the password hash.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<UserRecord>> {
    let record = sqlx::query_as::<_, UserRecord>(
        "SELECT id, username, password, is_admin FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// ## Errors
/// - `NotFound` if no row has this id
pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = ?",
        USER_COLUMNS
    ))
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("User not found".to_string()),
        _ => AppError::Database(e),
    })?;

    Ok(user)
}

pub async fn username_exists(pool: &SqlitePool, username: &str) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT 1 FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .is_some();

    Ok(exists)
}

pub async fn count_admins(pool: &SqlitePool) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_admin = 1")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

// The UNIQUE constraint still catches a username taken between the
// handler's existence check and this insert.
pub async fn create_user(pool: &SqlitePool, new_user: &NewUser) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, password, first_name, last_name, gender, birthdate, is_admin,
                            username_folded, first_name_folded, last_name_folded)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&new_user.username)
    .bind(&new_user.password_hash)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(new_user.gender)
    .bind(new_user.birthdate)
    .bind(new_user.is_admin)
    .bind(fold(&new_user.username))
    .bind(new_user.first_name.as_deref().map(fold))
    .bind(new_user.last_name.as_deref().map(fold))
    .fetch_one(pool)
    .await
    .map_err(conflict_on_unique)?;

    Ok(user)
}

/// Apply a partial update; an empty patch just reads the current row back.
pub async fn update_user(pool: &SqlitePool, user_id: i64, patch: &UserPatch) -> AppResult<User> {
    if patch.is_empty() {
        return find_by_id(pool, user_id).await;
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET ");
    {
        let mut set = qb.separated(", ");
        if let Some(username) = &patch.username {
            set.push("username = ").push_bind_unseparated(username.clone());
            set.push("username_folded = ").push_bind_unseparated(fold(username));
        }
        if let Some(hash) = &patch.password_hash {
            set.push("password = ").push_bind_unseparated(hash.clone());
        }
        if let Some(first_name) = &patch.first_name {
            set.push("first_name = ").push_bind_unseparated(first_name.clone());
            set.push("first_name_folded = ")
                .push_bind_unseparated(first_name.as_deref().map(fold));
        }
        if let Some(last_name) = &patch.last_name {
            set.push("last_name = ").push_bind_unseparated(last_name.clone());
            set.push("last_name_folded = ")
                .push_bind_unseparated(last_name.as_deref().map(fold));
        }
        if let Some(gender) = patch.gender {
            set.push("gender = ").push_bind_unseparated(gender);
        }
        if let Some(birthdate) = patch.birthdate {
            set.push("birthdate = ").push_bind_unseparated(birthdate);
        }
        if let Some(is_admin) = patch.is_admin {
            set.push("is_admin = ").push_bind_unseparated(is_admin);
        }
    }
    qb.push(" WHERE id = ").push_bind(user_id);
    qb.push(" RETURNING ").push(USER_COLUMNS);

    let user = qb
        .build_query_as::<User>()
        .fetch_optional(pool)
        .await
        .map_err(conflict_on_unique)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(user)
}

/// Returns false when no row had this id.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every listed id in one statement; returns the rows removed.
/// Ids with no row are skipped silently.
pub async fn delete_users(pool: &SqlitePool, user_ids: &[i64]) -> AppResult<u64> {
    if user_ids.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("DELETE FROM users WHERE id IN (");
    {
        let mut ids = qb.separated(", ");
        for id in user_ids {
            ids.push_bind(*id);
        }
    }
    qb.push(")");

    let result = qb.build().execute(pool).await?;

    Ok(result.rows_affected())
}

/// Case folding for the `*_folded` search columns and the search term.
/// Done here because SQLite only folds ASCII.
fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// Case-insensitive substring match on username, first and last name.
fn push_search_filter(qb: &mut QueryBuilder<'_, Sqlite>, search: Option<&str>) {
    let Some(term) = search else {
        return;
    };

    let pattern = format!("%{}%", escape_like(&fold(term)));
    qb.push(" WHERE (username_folded LIKE ")
        .push_bind(pattern.clone())
        .push(" ESCAPE '\\' OR first_name_folded LIKE ")
        .push_bind(pattern.clone())
        .push(" ESCAPE '\\' OR last_name_folded LIKE ")
        .push_bind(pattern)
        .push(" ESCAPE '\\')");
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One page of users plus the total matching `query.search`
///
/// Ordered by the whitelisted sort column, then `id ASC` so pages are
/// stable when names tie.
pub async fn list_users(pool: &SqlitePool, query: &UserListQuery) -> AppResult<UserPage> {
    let search = query.search.as_deref().filter(|s| !s.is_empty());

    let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM users");
    push_search_filter(&mut count_qb, search);
    let total = count_qb
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
    qb.push(USER_COLUMNS).push(" FROM users");
    push_search_filter(&mut qb, search);
    qb.push(" ORDER BY ")
        .push(query.sort.column())
        .push(" ")
        .push(query.order.keyword())
        .push(", id ASC LIMIT ")
        .push_bind(query.limit)
        .push(" OFFSET ")
        .push_bind(query.offset());

    let users = qb.build_query_as::<User>().fetch_all(pool).await?;

    tracing::debug!(
        total,
        returned = users.len(),
        page = query.page,
        "listed users"
    );

    Ok(UserPage {
        users,
        total,
        page: query.page,
        total_pages: UserPage::total_pages(total, query.limit),
    })
}
