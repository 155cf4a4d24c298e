//! Authentication service.
//!
//! Owns the credential exchange and the bearer-token lifecycle:
//! argon2id password verification, opaque token issuance, sliding-expiry
//! resolution, and revocation. The anti-forgery handshake that gates the
//! login call lives in [`crate::middleware::csrf`].

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use thiserror::Error;

use gala_core::Email;

use crate::db::RepositoryError;
use crate::db::admins::AdminRepository;
use crate::db::tokens::TokenRepository;
use crate::models::CurrentAdmin;

/// Sliding token lifetime. Each authenticated use pushes the expiry this
/// far into the future; an idle token dies after this long.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Entropy of the opaque bearer string.
const TOKEN_BYTES: usize = 40;

/// Errors that can occur during authentication operations.
///
/// None of these reach the client verbatim — the error layer collapses
/// everything except repository failures into one generic 401.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or inactive account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, mismatched, expired or forged handshake proof.
    #[error("invalid handshake proof")]
    InvalidHandshake,

    /// Unknown, expired or revoked bearer token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    /// Identity projection to return to the client.
    pub user: CurrentAdmin,
    /// The plain bearer token. This is the only place it ever exists in
    /// plain form; the database keeps a digest.
    pub token: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    admins: AdminRepository<'a>,
    tokens: TokenRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            admins: AdminRepository::new(pool),
            tokens: TokenRepository::new(pool),
        }
    }

    /// Exchange credentials for a fresh bearer token.
    ///
    /// Existing tokens for the same identity stay valid — concurrent
    /// sessions from several devices are intended.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on unknown email, wrong
    /// password, or an inactive account, without distinguishing them.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        device_name: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .admins
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.active {
            return Err(AuthError::InvalidCredentials);
        }

        verify_password(password, &password_hash)?;

        let (token, digest) = generate_token();
        let expires_at = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
        self.tokens
            .create(user.id, &digest, device_name, expires_at)
            .await?;

        Ok(LoginOutcome {
            user: user.into(),
            token,
        })
    }

    /// Resolve a bearer token to the identity it was issued for.
    ///
    /// A successful resolution slides the expiry window forward, so an
    /// actively used token never goes stale mid-session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for anything that is not a live
    /// token bound to an active account.
    pub async fn authenticate(&self, bearer: &str) -> Result<CurrentAdmin, AuthError> {
        let live = self
            .tokens
            .find_live(&hash_token(bearer))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let renewed = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
        self.tokens.touch(live.token_id, renewed).await?;

        Ok(live.admin.into())
    }

    /// Revoke a bearer token.
    ///
    /// Idempotent: revoking an already-revoked or never-issued token is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the delete itself fails.
    pub async fn logout(&self, bearer: &str) -> Result<(), AuthError> {
        self.tokens.revoke(&hash_token(bearer)).await?;
        Ok(())
    }
}

/// Generate a fresh opaque token and its storage digest.
#[must_use]
pub fn generate_token() -> (String, String) {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    let digest = hash_token(&token);
    (token, digest)
}

/// Digest used to store and look up a token at rest.
#[must_use]
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored argon2 hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch, or
/// `AuthError::PasswordHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_is_opaque_and_unique() {
        let (token_a, digest_a) = generate_token();
        let (token_b, digest_b) = generate_token();

        assert_ne!(token_a, token_b);
        assert_ne!(digest_a, digest_b);
        // url-safe base64, no padding
        assert!(
            token_a
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_hash_token_is_stable_sha256_hex() {
        let digest = hash_token("some-bearer-token");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_token("some-bearer-token"));
        assert_ne!(digest, hash_token("some-other-token"));
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::PasswordHash)
        ));
    }
}
