//! Uploaded image records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageStats {
    #[serde(default)]
    pub total_images: u64,
    #[serde(default)]
    pub used_images: u64,
    #[serde(default)]
    pub unused_images: u64,
    /// Bytes
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub total_size_mb: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub id: i64,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    pub file_url: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub is_used: bool,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Result of a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedImage {
    pub id: i64,
    #[serde(default)]
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub file_size: u64,
}

/// Filter for the image list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    All,
    Used,
    Unused,
}

impl ImageFilter {
    /// Value of the `is_used` query parameter, if any
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            ImageFilter::All => None,
            ImageFilter::Used => Some("true"),
            ImageFilter::Unused => Some("false"),
        }
    }
}

/// One page of images
///
/// The images endpoint puts paging beside `data` rather than inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageList {
    pub images: Vec<ImageRecord>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Extensions the admin API accepts for uploads
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Largest accepted upload, 10 MiB
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// MIME type for an allowed image extension
pub fn image_mime(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}
