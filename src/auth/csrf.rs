//! CSRF double-submit tokens
//!
//! The token lives in a script-readable cookie and must be echoed back in
//! the `x-csrf-token` header on every mutating request.

use base64::prelude::*;
use constant_time_eq::constant_time_eq;
use rand::RngCore;

pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_BYTES: usize = 24;

/// A fresh random token, base64url without padding
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

/// Constant-time comparison; empty tokens never match.
pub fn tokens_match(presented: &str, expected: &str) -> bool {
    if presented.is_empty() || expected.is_empty() {
        return false;
    }
    constant_time_eq(presented.as_bytes(), expected.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_random_and_url_safe() {
        let a = generate_token();
        let b = generate_token();

        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_matching() {
        let token = generate_token();
        assert!(tokens_match(&token, &token.clone()));
        assert!(!tokens_match(&token, &generate_token()));
        assert!(!tokens_match(&token[..10], &token));
        assert!(!tokens_match("", ""));
    }
}
