//! # User Admin Server
//!
//! Entry point for a small admin panel API: session-authenticated admins
//! list, search, create, edit and delete accounts in a `users` table.
//!
//! ## Key Concepts
//! - **Session cookie**: a signed JWT proving the caller is a logged-in admin
//! - **CSRF token**: a second cookie the frontend echoes in `x-csrf-token`
//! - **Partial update**: only the fields a request names are changed

// Module declarations - organize code into logical components
mod app;         // Router and middleware stack
mod auth;        // Session tokens, password hashing, CSRF, cookies
mod config;      // Configuration management (environment variables, settings)
mod db;          // Database operations on the users table
mod error;       // Error handling and custom error types
mod handlers;    // HTTP request handlers (routes)
mod middleware;  // Session, admin and CSRF checks
mod state;       // Shared application state
mod validation;  // Input sanitation and field validation


use crate::config::Config;
use crate::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main application entry point
///
/// This function:
/// 1. Sets up logging
/// 2. Loads configuration from environment variables
/// 3. Connects to the database and runs migrations
/// 4. Seeds the first admin account if one is configured
/// 5. Builds the router and starts the HTTP server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default: info level for most crates, debug level for our app
    // Can be overridden with RUST_LOG environment variable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,user_admin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    let app_state = AppState::new(&config).await?;
    tracing::info!("Application state initialized");

    if let Some(admin) = &config.bootstrap_admin {
        app_state.ensure_bootstrap_admin(admin).await?;
    }

    let app = app::router(app_state, &config.static_dir);

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
