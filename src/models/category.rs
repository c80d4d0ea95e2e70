//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category as returned by the admin API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub article_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Entry of the public category list used by the slug classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicCategory {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub article_count: i64,
}

/// Input for creating or updating a category
///
/// The admin API derives the slug from the name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            sort_order: 0,
            is_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_public_category_minimal() {
        let cat: PublicCategory = serde_json::from_value(json!({"slug": "ngoai-hang-anh"})).unwrap();
        assert_eq!(cat.slug, "ngoai-hang-anh");
        assert_eq!(cat.article_count, 0);
    }

    #[test]
    fn test_category_input_defaults_enabled() {
        let input: CategoryInput = serde_json::from_value(json!({"name": "La Liga"})).unwrap();
        assert!(input.is_enabled);
        assert_eq!(input, CategoryInput::new("La Liga"));
    }
}
