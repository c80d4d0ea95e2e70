//! Slug classifier
//!
//! Decides which page template renders a single-segment path such as
//! `/ngoai-hang-anh` (a category listing) or `/mu-thang-derby` (an article).
//! The admin API's public category list is the only source of truth and
//! is fetched on every call.

use crate::models::PublicCategory;
use crate::upstream::AdminApi;

/// Listing page template file
pub const LISTING_TEMPLATE: &str = "articles.html";
/// Article page template file
pub const ARTICLE_TEMPLATE: &str = "article.html";
/// Home page file
pub const HOME_PAGE: &str = "index.html";

/// Page template chosen for a slug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTemplate {
    /// Category article listing
    Listing,
    /// Single article
    Article,
}

impl PageTemplate {
    pub fn file_name(&self) -> &'static str {
        match self {
            PageTemplate::Listing => LISTING_TEMPLATE,
            PageTemplate::Article => ARTICLE_TEMPLATE,
        }
    }
}

/// Classify a segment against a category list
pub fn classify(segment: &str, categories: &[PublicCategory]) -> PageTemplate {
    if categories.iter().any(|c| c.slug == segment) {
        PageTemplate::Listing
    } else {
        PageTemplate::Article
    }
}

/// Segments that are never classified
pub fn is_reserved(segment: &str, admin_mount: &str) -> bool {
    segment == "api"
        || segment == admin_mount
        || segment == LISTING_TEMPLATE
        || segment == ARTICLE_TEMPLATE
        || segment == HOME_PAGE
}

#[derive(Debug, Clone)]
pub struct SlugClassifier {
    admin: AdminApi,
}

impl SlugClassifier {
    pub fn new(admin: AdminApi) -> Self {
        Self { admin }
    }

    /// Template for a segment, failing open to the article page
    pub async fn resolve(&self, segment: &str) -> PageTemplate {
        match self.admin.public_categories().await {
            Ok(envelope) if envelope.success => {
                classify(segment, envelope.data.as_deref().unwrap_or_default())
            }
            Ok(envelope) => {
                tracing::warn!(
                    "Category list unavailable ({}), treating '{}' as an article",
                    envelope.failure_reason(),
                    segment
                );
                PageTemplate::Article
            }
            Err(e) => {
                tracing::error!("Error checking slug type for '{}': {}", segment, e);
                PageTemplate::Article
            }
        }
    }
}
