//! Data models
//!
//! Transient DTOs exchanged with the admin API. Durable state lives
//! behind that API; nothing here is persisted by this crate.

mod article;
mod category;
mod envelope;
mod image;
mod ip_list;
mod stats;

pub use article::{is_valid_slug, Article, ArticleInput, ArticleList, ArticleQuery, ArticleStatus};
pub use category::{Category, CategoryInput, PublicCategory};
pub use envelope::{Envelope, PageInfo};
pub use image::{
    image_mime, ImageFilter, ImageList, ImageRecord, ImageStats, UploadedImage,
    ALLOWED_IMAGE_EXTENSIONS, MAX_IMAGE_BYTES,
};
pub use ip_list::{BlacklistEntry, BlacklistInput, WhitelistEntry, WhitelistInput};
pub use stats::{Dashboard, DayCounts, SystemInfo, TrendPoint, VisitorList, VisitorRecord, VisitorStats};
