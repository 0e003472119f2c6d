//! Session and CSRF cookies
//!
//! Both cookies share one policy: `Path=/`, `Max-Age` equal to the session
//! lifetime, and `Secure` + `SameSite=Strict` in production (`Lax`
//! otherwise). Only the session cookie is `HttpOnly`; the frontend has to
//! read the CSRF cookie to echo it back.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const SESSION_COOKIE: &str = "token";
pub const CSRF_COOKIE: &str = "csrfToken";

#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
    pub max_age: Duration,
}

impl CookiePolicy {
    pub fn new(production: bool, ttl_secs: i64) -> Self {
        Self {
            secure: production,
            max_age: Duration::seconds(ttl_secs),
        }
    }

    fn same_site(&self) -> SameSite {
        if self.secure {
            SameSite::Strict
        } else {
            SameSite::Lax
        }
    }

    fn build(&self, name: &'static str, value: String, http_only: bool) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(http_only)
            .secure(self.secure)
            .same_site(self.same_site())
            .max_age(self.max_age)
            .build()
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        self.build(SESSION_COOKIE, token, true)
    }

    pub fn csrf_cookie(&self, token: String) -> Cookie<'static> {
        self.build(CSRF_COOKIE, token, false)
    }

    /// Expire both cookies
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
            .remove(Cookie::build(CSRF_COOKIE).path("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_cookies() {
        let policy = CookiePolicy::new(false, 3600);

        let session = policy.session_cookie("abc".into());
        assert_eq!(session.name(), SESSION_COOKIE);
        assert_eq!(session.http_only(), Some(true));
        assert_eq!(session.same_site(), Some(SameSite::Lax));
        assert_eq!(session.max_age(), Some(Duration::hours(1)));
        assert_eq!(session.path(), Some("/"));

        let csrf = policy.csrf_cookie("xyz".into());
        assert_eq!(csrf.name(), CSRF_COOKIE);
        assert_eq!(csrf.http_only(), Some(false));
    }

    #[test]
    fn test_production_cookies_are_strict() {
        let policy = CookiePolicy::new(true, 3600);

        let session = policy.session_cookie("abc".into());
        assert_eq!(session.secure(), Some(true));
        assert_eq!(session.same_site(), Some(SameSite::Strict));
    }
}
