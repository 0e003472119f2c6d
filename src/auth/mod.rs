//! # Authentication Module
//!
//! Building blocks for the admin session:
//! - `session`: JWT claims, issuing and verifying session tokens
//! - `password`: bcrypt hashing off the async runtime
//! - `csrf`: double-submit token generation and comparison
//! - `cookies`: the cookie policy shared by the session and CSRF cookies
//!
//! ## Login Flow
//! 1. Client posts username/password → `handlers::auth::login`
//! 2. Password checked against the stored bcrypt hash, admin flag required
//! 3. Session token set as an HttpOnly cookie, CSRF token as a readable one
//! 4. Protected routes verify the session (`middleware::auth`) and, for
//!    mutating calls, the CSRF header (`middleware::csrf`)

pub mod cookies;
pub mod csrf;
pub mod password;
pub mod session;
