//! Product repository.

use bazaar_core::{CategoryId, ProductId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::{RepositoryError, map_insert_error};
use crate::models::{Category, Product, ProductFilter, ProductPatch, ProductWithCategory};

/// Product columns followed by the left-joined category, prefixed `category_`.
const SELECT_WITH_CATEGORY: &str = r"
    SELECT p.id, p.title, p.description, p.price, p.image_url, p.category_id,
           p.created_at, p.updated_at,
           c.id AS category_ref, c.name AS category_name,
           c.created_at AS category_created_at
    FROM bazaar.product p
    LEFT JOIN bazaar.category c ON c.id = p.category_id
";

#[derive(sqlx::FromRow)]
struct ProductCategoryRow {
    #[sqlx(flatten)]
    product: Product,
    category_ref: Option<CategoryId>,
    category_name: Option<String>,
    category_created_at: Option<DateTime<Utc>>,
}

impl From<ProductCategoryRow> for ProductWithCategory {
    fn from(row: ProductCategoryRow) -> Self {
        let category = match (row.category_ref, row.category_name, row.category_created_at) {
            (Some(id), Some(name), Some(created_at)) => Some(Category {
                id,
                name,
                created_at,
            }),
            _ => None,
        };
        Self {
            product: row.product,
            category,
        }
    }
}

/// Escape `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithCategory>, RepositoryError> {
        let sql = format!(
            r"{SELECT_WITH_CATEGORY}
            WHERE ($1::text IS NULL OR p.category_id = $1)
              AND ($2::text IS NULL OR p.title ILIKE '%' || $2 || '%')
            ORDER BY p.created_at DESC, p.id DESC
            "
        );

        let rows = sqlx::query_as::<_, ProductCategoryRow>(&sql)
            .bind(filter.category_id)
            .bind(filter.search.as_deref().map(escape_like))
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductWithCategory::from).collect())
    }

    /// Get a product by id with its category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithCategory>, RepositoryError> {
        let sql = format!("{SELECT_WITH_CATEGORY} WHERE p.id = $1");

        let row = sqlx::query_as::<_, ProductCategoryRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(ProductWithCategory::from))
    }

    /// Insert a product.
    ///
    /// The category reference is not checked here; the service resolves it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bazaar.product
                (id, title, description, price, image_url, category_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.image_url)
        .bind(product.category_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "product"))?;

        Ok(())
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            UPDATE bazaar.product
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image_url = COALESCE($5, image_url),
                category_id = COALESCE($6, category_id),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, description, price, image_url, category_id,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(patch.image_url.as_deref())
        .bind(patch.category_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Cart items referencing it are left in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM bazaar.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("iphone"), "iphone");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
