//! # HTTP Request Handlers
//!
//! This module contains all the HTTP route handlers (controllers).
//!
//! ## Submodules
//! - `health`: Health check endpoint (for monitoring)
//! - `auth`: Login, logout and session check
//! - `users`: User listing and CRUD for admins
//! - `types`: Request bodies and query strings
//! - `extract`: Json/Path/Query extractors that reject with `AppError`
//!
//! ## Handler Pattern
//! Handlers are async functions that:
//! 1. Extract data from request (path params, query, JSON body, cookies, session claims)
//! 2. Validate it and call the store
//! 3. Return a response, or an `AppError` that renders itself
//!
//! ```rust,ignore
//! pub async fn my_handler(
//!     State(state): State<AppState>,
//!     Json(req): Json<MyRequest>,
//! ) -> AppResult<Json<MyResponse>> {
//!     Ok(Json(response))
//! }
//! ```

pub mod auth;
pub mod extract;
pub mod health;
pub mod types;
pub mod users;
