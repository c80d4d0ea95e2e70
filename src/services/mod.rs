//! Services layer
//!
//! Business rules that sit between the HTTP handlers and the upstream
//! clients:
//! - football data with per-resource caching
//! - news headlines
//! - slug classification for single-segment pages

pub mod football;
pub mod news;
pub mod slug;

pub use football::{correct_team_id, is_really_live, season_for_date, FootballService};
pub use news::NewsService;
pub use slug::{classify, is_reserved, PageTemplate, SlugClassifier};
