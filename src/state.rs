//! # Application State
//!
//! This module defines the shared state that's accessible to all request
//! handlers and middleware.
//!
//! ## The State Pattern
//! Instead of creating new database connections for each request, we:
//! 1. Create a connection pool once at startup
//! 2. Store it in AppState
//! 3. Share it across all request handlers
//! 4. Axum clones the state for each request (cheap because we use Arc)

use crate::auth::cookies::CookiePolicy;
use crate::auth::password::hash_password;
use crate::auth::session::SessionIssuer;
use crate::config::{BootstrapAdmin, Config};
use crate::db::{self, models::NewUser, users};
use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

/// Shared application state
///
/// Nothing in here is mutated after startup; the pool is the only shared
/// resource requests contend on.
///
/// ## Why Clone?
/// Each request handler gets a clone of the state:
/// - `SqlitePool` is already a clone-able handle to a pool of connections
/// - `Arc<SessionIssuer>` only clones a pointer to the signing keys
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Signs and verifies session tokens
    pub sessions: Arc<SessionIssuer>,

    /// Attributes for the session and CSRF cookies
    pub cookies: CookiePolicy,

    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
}

impl AppState {
    /// Initialize application state
    ///
    /// This function:
    /// 1. Connects to the SQLite database
    /// 2. Runs database migrations (creates tables if they don't exist)
    /// 3. Builds the session issuer and cookie policy from the config
    ///
    /// # Errors
    /// Returns an error if the database connection or a migration fails.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = SqlitePool::connect(&config.database_url).await?;
        db::migrate(&db).await?;

        Ok(Self::with_pool(db, config))
    }

    /// Build state around an existing, already migrated pool
    pub fn with_pool(db: SqlitePool, config: &Config) -> Self {
        AppState {
            db,
            sessions: Arc::new(SessionIssuer::new(&config.jwt_secret, config.session_ttl_secs)),
            cookies: CookiePolicy::new(config.production, config.session_ttl_secs),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    /// Create the configured admin account if the table has no admin yet
    ///
    /// Returns true when an account was created.
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> Result<bool> {
        if users::count_admins(&self.db).await? > 0 {
            return Ok(false);
        }

        if users::username_exists(&self.db, &admin.username).await? {
            tracing::warn!(
                "No admin exists, but username '{}' is taken by a regular user; skipping bootstrap",
                admin.username
            );
            return Ok(false);
        }

        let password_hash = hash_password(admin.password.clone(), self.bcrypt_cost).await?;
        let user = users::create_user(
            &self.db,
            &NewUser {
                username: admin.username.clone(),
                password_hash,
                first_name: None,
                last_name: None,
                gender: None,
                birthdate: None,
                is_admin: true,
            },
        )
        .await?;

        tracing::info!("Bootstrap admin '{}' created (id {})", user.username, user.id);
        tracing::warn!("Change the bootstrap admin password after first login");

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_bootstrap_admin_runs_once() {
        let state = AppState::with_pool(test_pool().await, &Config::for_tests());
        let admin = BootstrapAdmin {
            username: "root".to_string(),
            password: "rootpassword".to_string(),
        };

        assert!(state.ensure_bootstrap_admin(&admin).await.unwrap());
        assert!(!state.ensure_bootstrap_admin(&admin).await.unwrap());

        let record = users::find_by_username(&state.db, "root").await.unwrap().unwrap();
        assert!(record.is_admin);
        assert!(bcrypt::verify("rootpassword", &record.password).unwrap());
    }
}
