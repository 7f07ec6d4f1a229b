//! Token-based identity
//!
//! Access tokens are `user_id:role:expiry:signature`, where the signature
//! is HMAC-SHA256 over the rest with the configured secret. The core only
//! ever sees the `(user_id, role)` pair this module extracts and verifies.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use chrono::{DateTime, Utc};
use common::models::{AuthUser, Role};
use common::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

fn sign(secret: &str, payload: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::Internal("invalid HMAC key".to_string()))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Mint a signed access token for a user
pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    role: Role,
    expires_at: DateTime<Utc>,
) -> Result<String> {
    let payload = format!("{}:{}:{}", user_id, role.as_str(), expires_at.timestamp());
    let signature = sign(secret, &payload)?;
    Ok(format!("{}:{}", payload, signature))
}

fn unauthorized(msg: &str) -> Error {
    Error::Unauthorized(msg.to_string())
}

/// Verify a token's signature and expiry, yielding the authenticated caller
pub fn verify_token(secret: &str, token: &str, now: DateTime<Utc>) -> Result<AuthUser> {
    let (payload, signature) = token
        .rsplit_once(':')
        .ok_or_else(|| unauthorized("malformed token"))?;

    let signature_bytes =
        hex::decode(signature).map_err(|_| unauthorized("malformed token signature"))?;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::Internal("invalid HMAC key".to_string()))?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature_bytes)
        .map_err(|_| unauthorized("invalid token signature"))?;

    // Only a verified payload is worth parsing.
    let mut parts = payload.split(':');
    let id = parts
        .next()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| unauthorized("malformed token payload"))?;
    let role = parts
        .next()
        .and_then(Role::parse)
        .ok_or_else(|| unauthorized("malformed token payload"))?;
    let expires = parts
        .next()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| unauthorized("malformed token payload"))?;
    if parts.next().is_some() {
        return Err(unauthorized("malformed token payload"));
    }

    if now.timestamp() > expires {
        return Err(unauthorized("token expired"));
    }

    Ok(AuthUser { id, role })
}

/// Capability check for administrative operations, invoked at the top of
/// each admin handler
pub fn require_admin(caller: &AuthUser) -> Result<()> {
    if caller.role == Role::Admin {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Administrator role required".to_string(),
        ))
    }
}

/// The authenticated caller, extracted from the bearer token
pub struct Caller(pub AuthUser);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError(unauthorized("missing bearer token")))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError(unauthorized("missing bearer token")))?;

        let user = verify_token(&state.config.auth_secret, token, Utc::now())?;
        Ok(Caller(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "test-secret";

    fn fresh_token(role: Role) -> (Uuid, String, DateTime<Utc>) {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let token = issue_token(SECRET, user_id, role, now + Duration::hours(1)).unwrap();
        (user_id, token, now)
    }

    #[test]
    fn token_round_trip() {
        let (user_id, token, now) = fresh_token(Role::Player);
        let user = verify_token(SECRET, &token, now).unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.role, Role::Player);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let (_, token, now) = fresh_token(Role::Player);
        // Promote ourselves to admin without re-signing.
        let tampered = token.replace(":player:", ":admin:");
        assert!(verify_token(SECRET, &tampered, now).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (_, token, now) = fresh_token(Role::Admin);
        assert!(verify_token("other-secret", &token, now).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let token = issue_token(SECRET, user_id, Role::Player, now - Duration::hours(1)).unwrap();
        match verify_token(SECRET, &token, now) {
            Err(Error::Unauthorized(msg)) => assert!(msg.contains("expired")),
            other => panic!("expected Unauthorized, got {:?}", other.map(|u| u.id)),
        }
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token(SECRET, "not-a-token", Utc::now()).is_err());
    }

    #[test]
    fn admin_guard_accepts_admin_only() {
        let admin = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let player = AuthUser {
            id: Uuid::new_v4(),
            role: Role::Player,
        };
        assert!(require_admin(&admin).is_ok());
        assert!(matches!(require_admin(&player), Err(Error::Forbidden(_))));
    }
}
