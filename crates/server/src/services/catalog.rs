//! Catalog service: categories and products.

use bazaar_core::{CategoryId, Price, ProductId};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::db::{RepositoryError, Store};
use crate::models::{
    Category, NewCategoryInput, NewProductInput, Product, ProductFilter, ProductPatch,
    ProductQuery, ProductWithCategory, UpdateProductInput,
};

/// Errors that can occur during catalog operations.
///
/// Display strings are the messages returned to API clients.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Category name missing, blank, or not a string.
    #[error("Category name is required")]
    CategoryNameRequired,

    /// A category with the same name (ignoring case) exists.
    #[error("Category already exists")]
    CategoryExists,

    /// No category matches the given name.
    #[error("Category not found")]
    CategoryNotFound,

    /// Product id is not 24 hexadecimal characters.
    #[error("Invalid product ID format (must be 24 hex characters)")]
    InvalidProductId,

    /// A required product field is missing or blank.
    #[error("All fields are required")]
    MissingProductFields,

    /// Price is not a number or not positive.
    #[error("Price must be a positive number")]
    InvalidPrice,

    /// Image URL does not start with `http`.
    #[error("imageUrl must be a valid URL")]
    InvalidImageUrl,

    /// No product with the given id.
    #[error("Product not found")]
    ProductNotFound,

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Trim a string field, treating blank as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_image_url(url: &str) -> Result<String, CatalogError> {
    let url = url.trim();
    if !url.starts_with("http") {
        return Err(CatalogError::InvalidImageUrl);
    }
    Ok(url.to_owned())
}

fn parse_product_id(id: &str) -> Result<ProductId, CatalogError> {
    ProductId::parse(id).map_err(|_| CatalogError::InvalidProductId)
}

/// Catalog service.
///
/// Handles category creation and lookup, and product CRUD with category
/// names resolved to ids.
pub struct CatalogService<'a> {
    store: &'a dyn Store,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.store.list_categories().await?)
    }

    /// Resolve a category by name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for a blank name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn resolve_category(&self, name: &str) -> Result<Option<Category>, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        Ok(self.store.find_category_by_name(name).await?)
    }

    /// Create a category with a trimmed name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CategoryNameRequired` if the name is missing or blank.
    /// Returns `CatalogError::CategoryExists` if the name is taken, ignoring case.
    #[instrument(name = "catalog.create_category", skip(self, input))]
    pub async fn create_category(&self, input: NewCategoryInput) -> Result<Category, CatalogError> {
        let name = input
            .name
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(CatalogError::CategoryNameRequired)?;

        if self.resolve_category(name).await?.is_some() {
            debug!(name, "Category name already taken");
            return Err(CatalogError::CategoryExists);
        }

        let category = Category {
            id: CategoryId::generate(),
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        self.store.insert_category(&category).await?;

        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products, optionally filtered by category name and title search.
    ///
    /// An unknown category yields an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the store fails.
    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<Vec<ProductWithCategory>, CatalogError> {
        let mut filter = ProductFilter {
            category_id: None,
            search: non_blank(query.search.as_deref()).map(str::to_owned),
        };

        if let Some(name) = non_blank(query.category.as_deref()) {
            let Some(category) = self.resolve_category(name).await? else {
                debug!(category = name, "Unknown category filter, returning no products");
                return Ok(Vec::new());
            };
            filter.category_id = Some(category.id);
        }

        Ok(self.store.list_products(&filter).await?)
    }

    /// Get a product with its category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProductId` if `id` is malformed.
    /// Returns `CatalogError::ProductNotFound` if no such product exists.
    pub async fn get_product(&self, id: &str) -> Result<ProductWithCategory, CatalogError> {
        let id = parse_product_id(id)?;
        self.store
            .find_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    /// Create a product in the named category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MissingProductFields` if any field is missing or blank.
    /// Returns `CatalogError::InvalidPrice` / `InvalidImageUrl` for bad values.
    /// Returns `CatalogError::CategoryNotFound` if the category does not exist.
    #[instrument(name = "catalog.create_product", skip(self, input))]
    pub async fn create_product(&self, input: NewProductInput) -> Result<Product, CatalogError> {
        let (Some(title), Some(description), Some(price), Some(image_url), Some(category_name)) = (
            non_blank(input.title.as_deref()),
            non_blank(input.description.as_deref()),
            input.price.as_ref(),
            non_blank(input.image_url.as_deref()),
            non_blank(input.category_name.as_deref()),
        ) else {
            return Err(CatalogError::MissingProductFields);
        };

        let price = Price::from_json(price).map_err(|_| CatalogError::InvalidPrice)?;
        let image_url = parse_image_url(image_url)?;
        let category = self
            .resolve_category(category_name)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;

        let now = Utc::now();
        let product = Product {
            id: ProductId::generate(),
            title: title.to_owned(),
            description: description.to_owned(),
            price,
            image_url,
            category_id: category.id,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_product(&product).await?;

        info!(product_id = %product.id, category_id = %category.id, "Product created");
        Ok(product)
    }

    /// Partially update a product.
    ///
    /// Blank or absent string fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProductId` if `id` is malformed.
    /// Returns `CatalogError::ProductNotFound` if no such product exists.
    /// Returns `CatalogError::InvalidPrice` / `InvalidImageUrl` / `CategoryNotFound`
    /// for bad values.
    #[instrument(name = "catalog.update_product", skip(self, input))]
    pub async fn update_product(
        &self,
        id: &str,
        input: UpdateProductInput,
    ) -> Result<Product, CatalogError> {
        let id = parse_product_id(id)?;
        if self.store.find_product(id).await?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }

        let mut patch = ProductPatch {
            title: non_blank(input.title.as_deref()).map(str::to_owned),
            description: non_blank(input.description.as_deref()).map(str::to_owned),
            ..ProductPatch::default()
        };

        if let Some(price) = &input.price {
            patch.price = Some(Price::from_json(price).map_err(|_| CatalogError::InvalidPrice)?);
        }
        if let Some(url) = non_blank(input.image_url.as_deref()) {
            patch.image_url = Some(parse_image_url(url)?);
        }
        if let Some(name) = non_blank(input.category_name.as_deref()) {
            let category = self
                .resolve_category(name)
                .await?
                .ok_or(CatalogError::CategoryNotFound)?;
            patch.category_id = Some(category.id);
        }

        let product = self
            .store
            .update_product(id, &patch)
            .await
            .map_err(|e| match e {
                // Deleted between the existence check and the update
                RepositoryError::NotFound => CatalogError::ProductNotFound,
                other => CatalogError::Repository(other),
            })?;

        info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Delete a product. Cart items referencing it are not touched.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidProductId` if `id` is malformed.
    /// Returns `CatalogError::ProductNotFound` if no such product exists.
    #[instrument(name = "catalog.delete_product", skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<(), CatalogError> {
        let id = parse_product_id(id)?;
        if self.store.find_product(id).await?.is_none() {
            return Err(CatalogError::ProductNotFound);
        }
        if !self.store.delete_product(id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
