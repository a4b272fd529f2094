use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::tprintln;

/// Token lifetime in seconds. Tokens are client-held and never stored server
/// side; expiry is a passive check at resolution time.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token is bound to.
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Issues and verifies HS256-signed bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Issue a signed token bound to `username`, expiring `TOKEN_TTL_SECS` from now.
    pub fn issue(&self, username: &str) -> AppResult<String> {
        self.issue_at(username, Utc::now().timestamp())
    }

    // Issuance against an explicit clock so expiry behavior stays testable.
    fn issue_at(&self, username: &str, now_secs: i64) -> AppResult<String> {
        let claims = Claims {
            sub: username.to_string(),
            iat: now_secs as usize,
            exp: (now_secs + TOKEN_TTL_SECS) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal { code: "token_sign_failed".into(), message: e.to_string() })?;
        tprintln!("token.issue user={} ttl_secs={}", username, TOKEN_TTL_SECS);
        Ok(token)
    }

    /// Verify signature and expiry; return the embedded username.
    pub fn resolve(&self, token: &str) -> AppResult<String> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::auth("token_expired", "Token has expired, please log in again")
            }
            _ => AppError::auth("invalid_token", "Token is missing or invalid"),
        })?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_resolve_roundtrips_username() {
        let tokens = TokenService::new("access");
        let token = tokens.issue("alice").expect("issue");
        assert_eq!(tokens.resolve(&token).expect("resolve"), "alice");
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new("access");
        let now = Utc::now().timestamp();
        let stale = tokens.issue_at("alice", now - TOKEN_TTL_SECS - 1).expect("issue backdated");
        let err = tokens.resolve(&stale).unwrap_err();
        assert_eq!(err.http_status(), 401);
        assert_eq!(err.code_str(), "token_expired");
    }

    #[test]
    fn token_near_expiry_still_resolves() {
        let tokens = TokenService::new("access");
        let now = Utc::now().timestamp();
        let aging = tokens.issue_at("alice", now - TOKEN_TTL_SECS + 60).expect("issue");
        assert_eq!(tokens.resolve(&aging).expect("still valid"), "alice");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = TokenService::new("access");
        let other = TokenService::new("different-secret");
        let token = issuer.issue("alice").unwrap();
        let err = other.resolve(&token).unwrap_err();
        assert_eq!(err.http_status(), 401);
        assert_eq!(err.code_str(), "invalid_token");
    }

    #[test]
    fn garbage_token_is_rejected() {
        let tokens = TokenService::new("access");
        let err = tokens.resolve("not-a-token").unwrap_err();
        assert_eq!(err.code_str(), "invalid_token");
    }
}
