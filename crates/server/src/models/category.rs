//! Category model.

use bazaar_core::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product category.
///
/// Names are unique ignoring case. The store does not enforce this; the
/// catalog service checks before every insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Returns `true` if `name` matches this category ignoring case and
    /// surrounding whitespace.
    #[must_use]
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Raw input for creating a category.
///
/// `name` is kept untyped so that a non-string value gets the same
/// validation message as a missing one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCategoryInput {
    #[serde(default)]
    pub name: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_ignores_case_and_whitespace() {
        let category = Category {
            id: CategoryId::generate(),
            name: "Shoes".to_string(),
            created_at: Utc::now(),
        };
        assert!(category.name_matches("shoes"));
        assert!(category.name_matches("  SHOES "));
        assert!(!category.name_matches("shoe"));
    }
}
