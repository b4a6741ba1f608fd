//! Seed the catalog from a YAML file.
//!
//! Categories and products go through the catalog service, so the same
//! validation and case-insensitive category matching apply as over HTTP.
//! Re-running a seed is safe: existing categories are reused and a product
//! whose title already exists in its category is skipped.
//!
//! ```yaml
//! categories:
//!   - Mobiles
//! products:
//!   - title: Pixel 8
//!     description: Android phone
//!     price: 699.0
//!     imageUrl: https://img.example/pixel.png
//!     category: Mobiles
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use bazaar_server::db::{self, PgStore};
use bazaar_server::models::{NewCategoryInput, NewProductInput, ProductQuery};
use bazaar_server::services::CatalogService;

use super::migrate::database_url;

/// Contents of a seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSeed {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// One product of a seed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeed {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
}

/// Counts reported after seeding.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories_created: usize,
    pub categories_reused: usize,
    pub products_created: usize,
    pub products_skipped: usize,
}

/// Check a seed file before touching the database.
///
/// Returns one message per problem found.
#[must_use]
pub fn validate_seed(seed: &CatalogSeed) -> Vec<String> {
    let mut errors = Vec::new();

    for (i, name) in seed.categories.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(format!("categories[{i}]: name is blank"));
        }
    }

    for (i, product) in seed.products.iter().enumerate() {
        let label = format!("products[{i}] ({})", product.title.trim());
        for (field, value) in [
            ("title", &product.title),
            ("description", &product.description),
            ("imageUrl", &product.image_url),
            ("category", &product.category),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{label}: {field} is blank"));
            }
        }
        if !product.price.is_finite() || product.price <= 0.0 {
            errors.push(format!("{label}: price must be a positive number"));
        }
        if !product.image_url.trim().starts_with("http") {
            errors.push(format!("{label}: imageUrl must be a valid URL"));
        }
    }

    errors
}

/// Apply a parsed seed through the catalog service.
///
/// # Errors
///
/// Returns the first catalog error encountered.
pub async fn apply_seed(
    catalog: &CatalogService<'_>,
    seed: &CatalogSeed,
) -> Result<SeedSummary, Box<dyn std::error::Error>> {
    let mut summary = SeedSummary::default();

    for name in &seed.categories {
        if catalog.resolve_category(name).await?.is_some() {
            summary.categories_reused += 1;
            continue;
        }
        catalog
            .create_category(NewCategoryInput {
                name: Some(serde_json::Value::from(name.as_str())),
            })
            .await?;
        summary.categories_created += 1;
    }

    for product in &seed.products {
        let title = product.title.trim();
        let existing = catalog
            .list_products(&ProductQuery {
                category: Some(product.category.clone()),
                search: Some(title.to_owned()),
            })
            .await?;
        if existing
            .iter()
            .any(|p| p.product.title.eq_ignore_ascii_case(title))
        {
            summary.products_skipped += 1;
            continue;
        }

        catalog
            .create_product(NewProductInput {
                title: Some(product.title.clone()),
                description: Some(product.description.clone()),
                price: Some(serde_json::Value::from(product.price)),
                image_url: Some(product.image_url.clone()),
                category_name: Some(product.category.clone()),
            })
            .await?;
        summary.products_created += 1;
    }

    Ok(summary)
}

/// Seed the catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or a database operation fails.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog seed");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let seed: CatalogSeed = serde_yaml::from_str(&content)?;

    info!(
        categories = seed.categories.len(),
        products = seed.products.len(),
        "Parsed seed file"
    );

    let errors = validate_seed(&seed);
    if !errors.is_empty() {
        error!("Seed validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let database_url = database_url()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store = PgStore::new(pool);
    let summary = apply_seed(&CatalogService::new(&store), &seed).await?;

    info!("Seeding complete!");
    info!("  Categories created: {}", summary.categories_created);
    info!("  Categories reused: {}", summary.categories_reused);
    info!("  Products created: {}", summary.products_created);
    info!("  Products skipped (already exist): {}", summary.products_skipped);

    Ok(())
}
