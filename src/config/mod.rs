//! Configuration management
//!
//! This module handles loading and parsing configuration for the Bongdaha server.
//! Configuration can be loaded from:
//! - config.yml file
//! - `.env` file and environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream football data API
    #[serde(default)]
    pub football: FootballConfig,
    /// RSS news feed
    #[serde(default)]
    pub news: NewsConfig,
    /// External admin API
    #[serde(default)]
    pub admin: AdminConfig,
    /// Static site layout
    #[serde(default)]
    pub site: SiteConfig,
    /// Response cache
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means every origin is allowed.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// API-Football configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootballConfig {
    /// API key sent as `x-apisports-key`
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_football_base")]
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for FootballConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_football_base(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl FootballConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_football_base() -> String {
    "https://v3.football.api-sports.io".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

/// News feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// Number of items returned when `limit` is absent or invalid
    #[serde(default = "default_news_limit")]
    pub default_limit: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            default_limit: default_news_limit(),
        }
    }
}

fn default_feed_url() -> String {
    "https://vnexpress.net/rss/the-thao.rss".to_string()
}

fn default_news_limit() -> usize {
    15
}

/// Admin API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Base URL of the admin API (without the `/api` suffix)
    #[serde(default = "default_admin_api_url")]
    pub api_url: String,
    /// Public domain of the site, handed to browser clients
    #[serde(default = "default_frontend_domain")]
    pub frontend_domain: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: default_admin_api_url(),
            frontend_domain: default_frontend_domain(),
        }
    }
}

fn default_admin_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_frontend_domain() -> String {
    "https://localhost:3000".to_string()
}

/// Static site layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory holding the public site and its page templates
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Directory holding the admin panel bundle
    #[serde(default = "default_admin_dir")]
    pub admin_dir: PathBuf,
    /// URL segment the admin bundle is mounted at
    #[serde(default = "default_admin_mount")]
    pub admin_mount: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            public_dir: default_public_dir(),
            admin_dir: default_admin_dir(),
            admin_mount: default_admin_mount(),
        }
    }
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_admin_dir() -> PathBuf {
    PathBuf::from("admin")
}

fn default_admin_mount() -> String {
    "admin".to_string()
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached responses
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    #[serde(default)]
    pub ttl: CacheTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            ttl: CacheTtlConfig::default(),
        }
    }
}

fn default_max_capacity() -> u64 {
    10_000
}

/// Per-resource TTLs in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    #[serde(default = "default_ttl_live")]
    pub live: u64,
    #[serde(default = "default_ttl_fixtures")]
    pub fixtures: u64,
    #[serde(default = "default_ttl_teams")]
    pub teams: u64,
    #[serde(default = "default_ttl_standings")]
    pub standings: u64,
    #[serde(default = "default_ttl_leagues")]
    pub leagues: u64,
    #[serde(default = "default_ttl_news")]
    pub news: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            live: default_ttl_live(),
            fixtures: default_ttl_fixtures(),
            teams: default_ttl_teams(),
            standings: default_ttl_standings(),
            leagues: default_ttl_leagues(),
            news: default_ttl_news(),
        }
    }
}

fn default_ttl_live() -> u64 {
    15
}

fn default_ttl_fixtures() -> u64 {
    300
}

fn default_ttl_teams() -> u64 {
    43_200
}

fn default_ttl_standings() -> u64 {
    1_800
}

fn default_ttl_leagues() -> u64 {
    86_400
}

fn default_ttl_news() -> u64 {
    600
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

/// Environment variables understood by [`Config::load_with_env`]
pub const ENV_KEYS: &[&str] = &[
    "HOST",
    "PORT",
    "CORS_ALLOWED_ORIGINS",
    "FOOTBALL_API_KEY",
    "FOOTBALL_API_BASE",
    "NEWS_FEED_URL",
    "ADMIN_API_URL",
    "FRONTEND_DOMAIN",
    "PUBLIC_DIR",
    "ADMIN_DIR",
    "ADMIN_MOUNT",
];

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;
        config.normalize();

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Variables from a `.env` file in the working directory are loaded
    /// first; variables already set in the process environment win.
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.normalize();

        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
            self.server.cors_allowed_origins = parse_allowed_origins(&origins);
        }

        if let Ok(key) = std::env::var("FOOTBALL_API_KEY") {
            self.football.api_key = Some(key);
        }
        if let Ok(base) = std::env::var("FOOTBALL_API_BASE") {
            self.football.base_url = base;
        }

        if let Ok(feed) = std::env::var("NEWS_FEED_URL") {
            self.news.feed_url = feed;
        }

        if let Ok(url) = std::env::var("ADMIN_API_URL") {
            self.admin.api_url = url;
        }
        if let Ok(domain) = std::env::var("FRONTEND_DOMAIN") {
            self.admin.frontend_domain = domain;
        }

        if let Ok(dir) = std::env::var("PUBLIC_DIR") {
            self.site.public_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("ADMIN_DIR") {
            self.site.admin_dir = PathBuf::from(dir);
        }
        if let Ok(mount) = std::env::var("ADMIN_MOUNT") {
            self.site.admin_mount = mount;
        }
    }

    /// Trim values whose exact shape matters downstream
    fn normalize(&mut self) {
        self.admin.api_url = self.admin.api_url.trim_end_matches('/').to_string();
        self.football.base_url = self.football.base_url.trim_end_matches('/').to_string();
        self.site.admin_mount = self.site.admin_mount.trim_matches('/').to_string();
        if self
            .football
            .api_key
            .as_deref()
            .is_some_and(|k| k.trim().is_empty())
        {
            self.football.api_key = None;
        }
    }
}

/// Split a comma separated origin list, dropping blanks
pub fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}

// Shared mutex for all config tests that modify environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
