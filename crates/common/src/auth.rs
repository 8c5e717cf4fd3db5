//! Token issuance and verification.
//!
//! Access and refresh tokens are signed JWTs carried in HttpOnly cookies (and
//! accepted as `Bearer` headers). The CSRF token is an opaque value issued in a
//! readable cookie and echoed back in a header by the client (double submit).

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, AppResult};

/// Which kind of token a JWT represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token authorizing API calls.
    Access,
    /// Long-lived token exchangeable for a fresh access token.
    Refresh,
}

/// Claims carried by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: i32,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Issued-at as a unix timestamp.
    pub iat: i64,
    /// Token kind.
    pub kind: TokenKind,
}

/// Encode a token for `user_id` valid for `ttl_secs` seconds.
pub fn encode_token(user_id: i32, kind: TokenKind, ttl_secs: i64, secret: &str) -> AppResult<String> {
    let now = Utc::now().timestamp();
    let claims = AccessClaims {
        sub: user_id,
        exp: now + ttl_secs,
        iat: now,
        kind,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
}

/// Decode and verify a token, checking signature, expiry, and kind.
pub fn decode_token(token: &str, kind: TokenKind, secret: &str) -> AppResult<AccessClaims> {
    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    if data.claims.kind != kind {
        return Err(AppError::Unauthorized);
    }

    Ok(data.claims)
}

/// Generate an opaque CSRF token.
#[must_use]
pub fn generate_csrf_token() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_encode_decode_roundtrip() {
        let token = encode_token(42, TokenKind::Access, 3600, SECRET).unwrap();
        let claims = decode_token(&token, TokenKind::Access, SECRET).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.kind, TokenKind::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_decode_rejects_wrong_kind() {
        let token = encode_token(42, TokenKind::Refresh, 3600, SECRET).unwrap();
        let result = decode_token(&token, TokenKind::Access, SECRET);

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let token = encode_token(42, TokenKind::Access, 3600, SECRET).unwrap();
        let result = decode_token(&token, TokenKind::Access, "other-secret");

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_decode_rejects_expired() {
        let token = encode_token(42, TokenKind::Access, -120, SECRET).unwrap();
        let result = decode_token(&token, TokenKind::Access, SECRET);

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_csrf_tokens_are_unique() {
        let a = generate_csrf_token();
        let b = generate_csrf_token();

        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
