//! Article model
//!
//! Articles are owned by the admin API. These types mirror its JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::envelope::null_as_default;
use super::PageInfo;

/// Article as returned by the admin API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: String,
    /// Serialized block-editor document
    #[serde(default)]
    pub content_json: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Article {
    /// Status label shown in listings
    pub fn status_label(&self) -> &'static str {
        if self.is_published {
            "published"
        } else {
            "draft"
        }
    }
}

/// Input for creating or updating an article
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleInput {
    pub title: String,
    /// Lowercase letters, digits and hyphens only
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_json: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub is_recommended: bool,
}

impl ArticleInput {
    /// Check the fields the admin API rejects
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if !is_valid_slug(&self.slug) {
            return Err(
                "Slug can only contain lowercase letters, numbers, and hyphens".to_string(),
            );
        }
        Ok(())
    }
}

/// Whether a slug is non-empty and made of `[a-z0-9-]`
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Publication filter for article listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    Published,
    Draft,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Published => "published",
            ArticleStatus::Draft => "draft",
        }
    }
}

/// Query parameters for listing articles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleQuery {
    pub page: u64,
    pub page_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            category_id: None,
            status: None,
            keyword: None,
        }
    }
}

/// One page of articles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
    #[serde(flatten)]
    pub page: PageInfo,
}
