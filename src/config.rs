//! # Configuration Management
//!
//! This module handles loading configuration from environment variables.
//! Configuration comes from the environment, with a `.env` file as a
//! convenience for local development.
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 3000)
//! - `DATABASE_URL`: SQLite database connection string
//! - `JWT_SECRET`: HMAC secret used to sign session tokens
//! - `SESSION_TTL_SECS`: Lifetime of a session token and its cookies (default: 3600)
//! - `APP_ENV`: `production` turns on `Secure` + `SameSite=Strict` cookies
//! - `BCRYPT_COST`: Work factor for password hashing (default: 10)
//! - `STATIC_DIR`: Directory holding the admin frontend (default: public)
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: Optional first admin account

use anyhow::{Context, Result};
use base64::prelude::*;
use rand::RngCore;
use std::env;

/// Application configuration
///
/// Holds every value needed to run the server. All fields are public for
/// easy access from other modules.
///
/// `Debug` is implemented by hand so the JWT secret and the bootstrap
/// password never end up in the logs.
#[derive(Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    /// Examples: "127.0.0.1" (localhost only), "0.0.0.0" (all interfaces)
    pub host: String,

    /// Server port number (1-65535)
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.db?mode=rwc"
    /// The "mode=rwc" means: read, write, create if not exists
    pub database_url: String,

    /// Secret for signing session tokens (HS256)
    pub jwt_secret: String,

    /// Session lifetime in seconds, shared by the token `exp` claim and the cookie `Max-Age`
    pub session_ttl_secs: i64,

    /// Production mode: cookies get `Secure` and `SameSite=Strict`
    pub production: bool,

    /// bcrypt work factor
    pub bcrypt_cost: u32,

    /// Directory served as the static fallback
    pub static_dir: String,

    /// First admin account, created at startup when the table has no admin
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the admin account seeded on first start
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads variables from .env file (if present) using dotenvy
    /// 2. Reads each configuration value from environment
    /// 3. Falls back to defaults if variables aren't set
    /// 4. Returns an error if parsing fails (e.g., invalid port number)
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=3000
    /// DATABASE_URL=sqlite:user_admin.db?mode=rwc
    /// JWT_SECRET=change-me
    /// APP_ENV=development
    /// ADMIN_USERNAME=admin
    /// ADMIN_PASSWORD=change-me-please
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (dotenvy doesn't error if file missing)
        dotenvy::dotenv().ok();

        // Without a configured secret, every restart invalidates all sessions
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using a random secret for this process");
                random_secret()
            }
        };

        let bootstrap_admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { username, password })
            }
            _ => None,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid port number")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:user_admin.db?mode=rwc".to_string()),

            jwt_secret,

            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .context("SESSION_TTL_SECS must be an integer")?,

            production: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),

            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("BCRYPT_COST must be an integer")?,

            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),

            bootstrap_admin,
        })
    }

    /// Get the socket address to bind the server to
    ///
    /// Combines host and port into a format suitable for TCP binding.
    /// Example: "127.0.0.1:3000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"<redacted>")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("production", &self.production)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("static_dir", &self.static_dir)
            .field(
                "bootstrap_admin",
                &self.bootstrap_admin.as_ref().map(|a| a.username.as_str()),
            )
            .finish()
    }
}

#[cfg(test)]
impl Config {
    /// Fast bcrypt, fixed secret, in-memory database
    pub fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-key-12345".to_string(),
            session_ttl_secs: 3600,
            production: false,
            bcrypt_cost: 4,
            static_dir: "public".to_string(),
            bootstrap_admin: None,
        }
    }
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config {
            port: 3000,
            jwt_secret: "super-secret-value".to_string(),
            bootstrap_admin: Some(BootstrapAdmin {
                username: "root".to_string(),
                password: "hunter22hunter22".to_string(),
            }),
            ..Config::for_tests()
        };

        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-value"));
        assert!(!printed.contains("hunter22"));
        assert!(printed.contains("root"));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn random_secrets_differ() {
        assert_ne!(random_secret(), random_secret());
    }
}
