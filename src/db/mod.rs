//! # Database Module
//!
//! Everything that touches the store lives here:
//! - `models`: Row types and the value types describing queries and changes
//! - `users`: Operations on the `users` table
//!
//! Functions take the pool as an argument instead of reaching for a global
//! handle, so tests can hand in an in-memory database.

pub mod models;
pub mod users;

use sqlx::sqlite::SqlitePool;

/// Run the embedded migrations against `pool`
///
/// The `sqlx::migrate!` macro embeds the files from `./migrations` at
/// compile time; applied migrations are tracked so each runs once.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// A fresh, migrated in-memory database
///
/// Every SQLite connection to `:memory:` gets its own database, so the pool
/// is pinned to a single connection.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    migrate(&pool).await.expect("migrations");
    pool
}
