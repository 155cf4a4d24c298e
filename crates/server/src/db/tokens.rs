//! Session token repository.
//!
//! Tokens are stored hashed (sha-256 of the opaque bearer string); the
//! plain value exists only in the login response. Rows are independent —
//! one admin may hold several live tokens at once, and revoking one never
//! touches the others.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gala_core::{AdminId, AdminRole, Email, SessionTokenId};

use super::RepositoryError;
use crate::models::AdminUser;

/// A live token joined with its owning admin account.
#[derive(Debug)]
pub struct LiveToken {
    pub token_id: SessionTokenId,
    pub admin: AdminUser,
}

/// Raw join row: token columns plus the owning admin.
#[derive(sqlx::FromRow)]
struct LiveTokenRow {
    token_id: i32,
    admin_id: i32,
    name: String,
    email: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LiveTokenRow> for LiveToken {
    type Error = RepositoryError;

    fn try_from(row: LiveTokenRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row.role.parse::<AdminRole>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            token_id: SessionTokenId::new(row.token_id),
            admin: AdminUser {
                id: AdminId::new(row.admin_id),
                name: row.name,
                email,
                role,
                active: row.active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
    }
}

/// Repository for session token operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a freshly issued token hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        admin_id: AdminId,
        token_hash: &str,
        device_name: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionTokenId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO session_tokens (admin_id, token_hash, device_name, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(admin_id.as_i32())
        .bind(token_hash)
        .bind(device_name)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(SessionTokenId::new(id))
    }

    /// Resolve a token hash to its owning admin, if the token is live.
    ///
    /// "Live" means: the row exists, `expires_at` is in the future, and the
    /// admin account is active. Everything else looks identical to the
    /// caller — a revoked, expired and never-issued token are
    /// indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn find_live(&self, token_hash: &str) -> Result<Option<LiveToken>, RepositoryError> {
        let row = sqlx::query_as::<_, LiveTokenRow>(
            "SELECT t.id AS token_id, a.id AS admin_id, a.name, a.email, a.role, a.active,
                    a.created_at, a.updated_at
             FROM session_tokens t
             JOIN admins a ON a.id = t.admin_id
             WHERE t.token_hash = $1
               AND t.expires_at > now()
               AND a.active",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        row.map(LiveToken::try_from).transpose()
    }

    /// Slide a token's expiry window forward after a successful use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn touch(
        &self,
        token_id: SessionTokenId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE session_tokens
             SET last_used_at = now(), expires_at = $2
             WHERE id = $1",
        )
        .bind(token_id.as_i32())
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a token row by its hash.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` if the token was
    /// already gone (revocation is idempotent).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn revoke(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
