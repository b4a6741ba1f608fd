//! Product model and its filter and patch types.

use bazaar_core::{CategoryId, Price, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::Category;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    /// Absolute image URL; always starts with `http`.
    pub image_url: String,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product with its category joined.
///
/// `category` is `None` when the referenced category no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}

/// Store-level product filter, with the category already resolved to an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

impl ProductFilter {
    /// Returns `true` if `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = self.category_id
            && product.category_id != category_id
        {
            return false;
        }
        self.search.as_ref().is_none_or(|term| {
            product
                .title
                .to_lowercase()
                .contains(&term.to_lowercase())
        })
    }
}

/// Fields to change on an existing product. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductPatch {
    /// Apply the patch in place and bump `updated_at`.
    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            product.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image_url) = &self.image_url {
            product.image_url.clone_from(image_url);
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        product.updated_at = now;
    }
}

/// Query string of `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Category name, matched ignoring case.
    pub category: Option<String>,
    /// Title substring, matched ignoring case.
    pub search: Option<String>,
}

/// Raw input for creating a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Untyped so that strings are reported as "not a number".
    pub price: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub category_name: Option<String>,
}

/// Raw input for a partial product update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductInput {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `None` only when the key is absent; an explicit `null` is `Some(Null)`.
    #[serde(default, deserialize_with = "present")]
    pub price: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub category_name: Option<String>,
}

fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<serde_json::Value>, D::Error> {
    serde_json::Value::deserialize(deserializer).map(Some)
}
