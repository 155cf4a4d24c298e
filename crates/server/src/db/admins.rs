//! Admin account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gala_core::{AdminId, AdminRole, Email};

use super::{RepositoryError, conflict_on_unique};
use crate::models::AdminUser;

/// Raw `admins` row.
#[derive(sqlx::FromRow)]
struct AdminRow {
    id: i32,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminRow {
    fn into_parts(self) -> Result<(AdminUser, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = self.role.parse::<AdminRole>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        let user = AdminUser {
            id: AdminId::new(self.id),
            name: self.name,
            email,
            role,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        Ok((user, self.password_hash))
    }
}

/// Repository for admin account operations.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an admin and their credential hash by email.
    ///
    /// Returns `None` if no account uses this email. The caller decides how
    /// to treat inactive accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, name, email, password_hash, role, active, created_at, updated_at
             FROM admins
             WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(AdminRow::into_parts).transpose()
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        role: AdminRole,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "INSERT INTO admins (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password_hash, role, active, created_at, updated_at",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(role.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        let (user, _) = row.into_parts()?;
        Ok(user)
    }
}
