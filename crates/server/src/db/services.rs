//! Service catalog repository (read-only).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gala_core::ServiceId;

use super::RepositoryError;
use crate::models::Service;

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: i32,
    title: String,
    slug: String,
    description: String,
    image: Option<String>,
    category: String,
    featured: bool,
    created_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: ServiceId::new(row.id),
            title: row.title,
            slug: row.slug,
            description: row.description,
            image: row.image,
            category: row.category,
            featured: row.featured,
            created_at: row.created_at,
        }
    }
}

/// Repository for service lookups.
pub struct ServiceRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ServiceRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All services.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, title, slug, description, image, category, featured, created_at
             FROM services
             ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    /// Featured services.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_featured(&self) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, title, slug, description, image, category, featured, created_at
             FROM services
             WHERE featured
             ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    /// Services in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(&self, category: &str) -> Result<Vec<Service>, RepositoryError> {
        let rows = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, title, slug, description, image, category, featured, created_at
             FROM services
             WHERE category = $1
             ORDER BY created_at DESC",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Service::from).collect())
    }

    /// One service by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Service>, RepositoryError> {
        let row = sqlx::query_as::<_, ServiceRow>(
            "SELECT id, title, slug, description, image, category, featured, created_at
             FROM services
             WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Service::from))
    }

    /// Number of services.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
