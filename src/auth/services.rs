pub(crate) use crate::auth::dto::{Claims, JwtKeys};
use crate::auth::repo_types::{Role, User};
use crate::config::JwtConfig;
use crate::state::AppState;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ARGON2ID_IDENT,
};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::time::Duration;
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, warn};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Product policy: a full name is exactly two whitespace-separated names.
pub(crate) fn is_valid_full_name(name: &str) -> bool {
    let mut parts = name.split_whitespace();
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(_), Some(_), None)
    )
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// True when a stored hash predates the current scheme and should be replaced
/// after the next successful verification.
pub fn needs_rehash(hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => parsed.algorithm != ARGON2ID_IDENT,
        Err(_) => true,
    }
}

/// Token verification failure, split so callers cannot conflate a
/// stale-but-genuine token with a tampered or malformed one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = data.claims.sub, "jwt verified");
                Ok(data.claims)
            }
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }
}

/// Resolved identity of an authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Set-membership role check; privileged handlers call this before any
    /// other work.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), (StatusCode, String)> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            warn!(user_id = self.id, role = ?self.role, "role not permitted");
            Err((StatusCode::FORBIDDEN, "Forbidden".to_string()))
        }
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = bearer_token(auth_header).ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header".to_string(),
        ))?;

        let keys = JwtKeys::from_ref(state);
        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(TokenError::Expired) => {
                warn!("expired token");
                return Err((StatusCode::UNAUTHORIZED, "Token expired".to_string()));
            }
            Err(TokenError::Invalid) => {
                warn!("invalid token");
                return Err((StatusCode::UNAUTHORIZED, "Invalid token".to_string()));
            }
        };

        let user = match User::find_by_id(&state.db, claims.sub).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                // The subject no longer exists; treat like a bad token.
                warn!(user_id = claims.sub, "token subject not found");
                return Err((StatusCode::UNAUTHORIZED, "Invalid token".to_string()));
            }
            Err(e) => {
                error!(error = %e, "find_by_id failed");
                return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
            }
        };

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}


#[cfg(test)]
mod password_tests {
    use super::*;
    use argon2::{Algorithm, Params, Version};

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn fresh_hash_does_not_need_rehash() {
        let hash = hash_password("some-password").expect("hashing should succeed");
        assert!(!needs_rehash(&hash));
    }

    #[test]
    fn legacy_variant_verifies_but_is_flagged_for_rehash() {
        let salt = SaltString::generate(&mut OsRng);
        let legacy = Argon2::new(Algorithm::Argon2i, Version::V0x13, Params::default())
            .hash_password(b"old-password", &salt)
            .expect("legacy hash")
            .to_string();
        assert!(verify_password("old-password", &legacy).expect("verify should succeed"));
        assert!(needs_rehash(&legacy));
        assert!(needs_rehash("$2b$12$not-an-argon2-hash"));
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    fn expired_claims(sub: i64) -> Claims {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        Claims {
            sub,
            iat: (now - 7200) as usize,
            exp: (now - 1) as usize,
        }
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn expired_token_reports_expired() {
        let keys = make_keys();
        let token =
            encode(&Header::default(), &expired_claims(7), &keys.encoding).expect("encode");
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[tokio::test]
    async fn tampered_signature_reports_invalid_even_when_expired() {
        let keys = make_keys();
        let token =
            encode(&Header::default(), &expired_claims(7), &keys.encoding).expect("encode");
        let (rest, sig) = token.rsplit_once('.').expect("three-part token");
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", rest, flipped, &sig[1..]);
        assert_eq!(keys.verify(&tampered), Err(TokenError::Invalid));
    }

    #[tokio::test]
    async fn garbage_reports_invalid() {
        let keys = make_keys();
        assert_eq!(keys.verify("not-a-token"), Err(TokenError::Invalid));
        assert_eq!(keys.verify(""), Err(TokenError::Invalid));
    }

    #[tokio::test]
    async fn token_from_another_secret_reports_invalid() {
        let keys = make_keys();
        let other = JwtKeys {
            encoding: jsonwebtoken::EncodingKey::from_secret(b"another-secret"),
            decoding: jsonwebtoken::DecodingKey::from_secret(b"another-secret"),
            ttl: Duration::from_secs(60),
        };
        let token = other.sign(1).expect("sign");
        assert_eq!(keys.verify(&token), Err(TokenError::Invalid));
    }
}

#[cfg(test)]
mod role_tests {
    use super::*;

    const ADMIN_ONLY: &[Role] = &[Role::Admin, Role::SuperAdmin];

    fn user_with_role(role: Role) -> AuthUser {
        AuthUser {
            id: 1,
            email: "a@b.com".into(),
            role,
        }
    }

    #[test]
    fn plain_user_is_forbidden() {
        let err = user_with_role(Role::User)
            .require_role(ADMIN_ONLY)
            .unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn admin_is_allowed() {
        assert!(user_with_role(Role::Admin).require_role(ADMIN_ONLY).is_ok());
    }

    #[test]
    fn super_admin_is_allowed() {
        assert!(user_with_role(Role::SuperAdmin)
            .require_role(ADMIN_ONLY)
            .is_ok());
    }

    #[test]
    fn empty_allowed_set_denies_everyone() {
        assert!(user_with_role(Role::SuperAdmin).require_role(&[]).is_err());
    }
}

#[cfg(test)]
mod extractor_tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
