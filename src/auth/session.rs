//! Session tokens
//!
//! A session is an HS256 JWT carried in the `token` cookie. Verification
//! failures of any kind (bad signature, malformed, expired) collapse into
//! [`AppError::InvalidSession`]; the absence of a token is reported by the
//! middleware as a separate error.

use crate::error::{AppError, AppResult};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// The principal as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl From<&SessionClaims> for SessionUser {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            id: claims.id,
            username: claims.username.clone(),
            role: claims.role,
        }
    }
}

/// Signs and verifies session tokens
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl SessionIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Cookie Max-Age and token exp are the same instant.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn issue(&self, id: i64, username: &str, role: Role) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            id,
            username: username.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs,
        };

        debug!(
            "Issuing session for user {} ({}), expires in {}s",
            username, id, self.ttl_secs
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!("Rejected session token: {}", e);
            AppError::InvalidSession
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let issuer = SessionIssuer::new("test-secret-key-12345", 3600);

        let token = issuer.issue(7, "root", Role::Admin).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.id, 7);
        assert_eq!(claims.username, "root");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let issuer = SessionIssuer::new("test-secret-key-12345", 3600);
        let err = issuer.verify("invalid.token.here").unwrap_err();
        assert!(matches!(err, AppError::InvalidSession));
    }

    #[test]
    fn test_different_secrets_reject() {
        let ours = SessionIssuer::new("secret1", 3600);
        let theirs = SessionIssuer::new("secret2", 3600);

        let token = theirs.issue(1, "mallory", Role::Admin).unwrap();
        assert!(matches!(ours.verify(&token), Err(AppError::InvalidSession)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = SessionIssuer::new("test-secret-key-12345", -10);

        let token = issuer.issue(1, "root", Role::Admin).unwrap();
        assert!(matches!(issuer.verify(&token), Err(AppError::InvalidSession)));
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        let role: Role = serde_json::from_str(r#""user""#).unwrap();
        assert_eq!(role, Role::User);
    }
}
