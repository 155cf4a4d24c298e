//! Portfolio repository (read-only).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use gala_core::PortfolioId;

use super::RepositoryError;
use crate::models::PortfolioItem;

#[derive(sqlx::FromRow)]
struct PortfolioRow {
    id: i32,
    title: String,
    description: String,
    image: Option<String>,
    category: String,
    featured: bool,
    created_at: DateTime<Utc>,
}

impl From<PortfolioRow> for PortfolioItem {
    fn from(row: PortfolioRow) -> Self {
        Self {
            id: PortfolioId::new(row.id),
            title: row.title,
            description: row.description,
            image: row.image,
            category: row.category,
            featured: row.featured,
            created_at: row.created_at,
        }
    }
}

/// Repository for portfolio lookups.
pub struct PortfolioRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PortfolioRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All portfolio entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<PortfolioItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, PortfolioRow>(
            "SELECT id, title, description, image, category, featured, created_at
             FROM portfolio
             ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PortfolioItem::from).collect())
    }

    /// Featured portfolio entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_featured(&self) -> Result<Vec<PortfolioItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, PortfolioRow>(
            "SELECT id, title, description, image, category, featured, created_at
             FROM portfolio
             WHERE featured
             ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PortfolioItem::from).collect())
    }

    /// Entries in a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<PortfolioItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, PortfolioRow>(
            "SELECT id, title, description, image, category, featured, created_at
             FROM portfolio
             WHERE category = $1
             ORDER BY created_at DESC",
        )
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(PortfolioItem::from).collect())
    }

    /// One entry by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: PortfolioId) -> Result<Option<PortfolioItem>, RepositoryError> {
        let row = sqlx::query_as::<_, PortfolioRow>(
            "SELECT id, title, description, image, category, featured, created_at
             FROM portfolio
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(PortfolioItem::from))
    }

    /// Number of entries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM portfolio")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
