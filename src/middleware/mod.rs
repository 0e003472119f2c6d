//! # Middleware Module
//!
//! Middleware runs before the route handlers and can short-circuit the
//! request with an error.
//!
//! ## Our Middleware
//! - `auth`: `require_session` verifies the session cookie and stores the
//!   claims in the request extensions; `require_admin` checks the role
//! - `csrf`: `verify_csrf` enforces the double-submit token on mutating calls
//!
//! For user routes they are layered so the order is session, admin, CSRF.

pub mod auth;
pub mod csrf;
