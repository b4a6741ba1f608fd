//! Category repository.

use sqlx::PgPool;

use crate::db::{RepositoryError, map_insert_error};
use crate::models::Category;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, created_at
            FROM bazaar.category
            ORDER BY lower(name), created_at
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get the oldest category whose name equals `name` ignoring case.
    ///
    /// Uniqueness is not enforced by a constraint, so more than one row can
    /// match after a race; the first one wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, created_at
            FROM bazaar.category
            WHERE lower(name) = lower($1)
            ORDER BY created_at, id
            LIMIT 1
            ",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, category: &Category) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bazaar.category (id, name, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.created_at)
        .execute(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "category"))?;

        Ok(())
    }
}
