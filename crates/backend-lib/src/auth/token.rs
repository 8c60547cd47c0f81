// ============================
// backend-lib/src/auth/token.rs
// ============================
//! Signed, self-contained session tokens.
//!
//! Tokens are HS256 JWTs carrying the account name (`sub`) and an expiry
//! (`exp`). Nothing is stored server side: a token is valid exactly when its
//! signature checks out against the signing secret and `exp` is still ahead.
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Session lifetime in seconds (24 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated account name
    pub sub: String,
    /// Issued at, Unix seconds
    pub iat: i64,
    /// Expiry, Unix seconds
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// True once `exp` is no longer in the future
    pub fn expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signing and verification keys derived from one secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims::new(subject, ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check shape, signature and expiry, returning the decoded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| classify(&e))?;
        // the library accepts `exp == now`; a session ends at its expiry instant
        if claims.expired() {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }

    /// Validate a token and return its subject.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        self.decode(token).map(|claims| claims.sub)
    }
}

fn classify(err: &jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::BadSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed,
    }
}

/// Issue a session token signed with `secret`.
pub fn issue_token(subject: &str, secret: &[u8], ttl: Duration) -> Result<String, AuthError> {
    SessionKeys::new(secret).issue(subject, ttl)
}

/// Validate a session token against `secret` and return its subject.
pub fn validate_token(token: &str, secret: &[u8]) -> Result<String, AuthError> {
    SessionKeys::new(secret).validate(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";

    fn day() -> Duration {
        Duration::seconds(DEFAULT_SESSION_TTL_SECS as i64)
    }

    /// Replace one character in the middle of the payload segment.
    fn flip_payload_byte(token: &str) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = &mut parts[1];
        let mid = payload.len() / 2;
        let replacement = if payload.as_bytes()[mid] == b'A' { "B" } else { "A" };
        payload.replace_range(mid..=mid, replacement);
        parts.join(".")
    }

    #[test]
    fn test_issue_then_validate() {
        let token = issue_token("bat", SECRET, day()).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(validate_token(&token, SECRET).unwrap(), "bat");
    }

    #[test]
    fn test_claims_carry_expiry() {
        let keys = SessionKeys::new(SECRET);
        let token = keys.issue("bat", day()).unwrap();
        let claims = keys.decode(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert!(!claims.expired());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token("bat", SECRET, Duration::seconds(-1)).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(AuthError::Expired));
    }

    #[test]
    fn test_zero_ttl_token_rejected() {
        let token = issue_token("bat", SECRET, Duration::zero()).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(AuthError::Expired));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = issue_token("bat", SECRET, day()).unwrap();
        let tampered = flip_payload_byte(&token);
        assert_ne!(tampered, token);
        assert_eq!(validate_token(&tampered, SECRET), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("bat", b"other-secret", day()).unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(AuthError::BadSignature));
    }

    #[test]
    fn test_malformed_input_rejected() {
        let inputs = [
            "",
            ".",
            "..",
            "onlytwoparts.here",
            "not.a.token",
            "a.b.c.d",
            "\u{0}\u{7f}\u{ff}garbage\u{1f600}",
            "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiJiYXQiLCJleHAiOjk5OTk5OTk5OTl9.",
        ];
        for input in inputs {
            assert_eq!(validate_token(input, SECRET), Err(AuthError::Malformed), "{input:?}");
        }
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = Claims::new("bat", day());
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        assert_eq!(validate_token(&token, SECRET), Err(AuthError::Malformed));
    }

    #[test]
    fn test_validation_is_repeatable() {
        let keys = SessionKeys::new(SECRET);
        let token = keys.issue("bat", day()).unwrap();
        assert_eq!(keys.validate(&token).unwrap(), "bat");
        assert_eq!(keys.validate(&token).unwrap(), "bat");
    }
}
