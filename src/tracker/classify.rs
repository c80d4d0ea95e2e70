//! Visitor classification from the user agent and page path
//!
//! Checks run in a fixed order and the first hit wins, so an Android user
//! agent (which also contains `Linux`) is reported as `Linux`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TABLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tablet|ipad|playbook|silk").expect("valid tablet regex"));

static MOBILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)mobile|iphone|ipod|android|blackberry|opera mini|iemobile")
        .expect("valid mobile regex")
});

static REFERENCE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(?:match|fixture|live|article)/(\d+)").expect("valid reference regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceType {
    Tablet,
    Mobile,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Os {
    Windows,
    #[serde(rename = "MacOS")]
    MacOs,
    Linux,
    Android,
    #[serde(rename = "iOS")]
    Ios,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Browser {
    Firefox,
    Samsung,
    Opera,
    #[serde(rename = "IE")]
    Ie,
    Edge,
    Chrome,
    Safari,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Home,
    Match,
    Live,
    Article,
    Other,
}

pub fn device_type(user_agent: &str) -> DeviceType {
    if TABLET.is_match(user_agent) {
        DeviceType::Tablet
    } else if MOBILE.is_match(user_agent) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

pub fn os(user_agent: &str) -> Os {
    if user_agent.contains("Win") {
        Os::Windows
    } else if user_agent.contains("Mac") {
        Os::MacOs
    } else if user_agent.contains("Linux") {
        Os::Linux
    } else if user_agent.contains("Android") {
        Os::Android
    } else if user_agent.contains("iPhone") || user_agent.contains("iPad") {
        Os::Ios
    } else {
        Os::Unknown
    }
}

pub fn browser(user_agent: &str) -> Browser {
    const ORDER: [(&str, Browser); 8] = [
        ("Firefox", Browser::Firefox),
        ("SamsungBrowser", Browser::Samsung),
        ("Opera", Browser::Opera),
        ("OPR", Browser::Opera),
        ("Trident", Browser::Ie),
        ("Edg", Browser::Edge),
        ("Chrome", Browser::Chrome),
        ("Safari", Browser::Safari),
    ];

    ORDER
        .iter()
        .find(|(needle, _)| user_agent.contains(needle))
        .map(|(_, browser)| *browser)
        .unwrap_or(Browser::Unknown)
}

pub fn page_type(path: &str) -> PageType {
    if path == "/" || path == "/index.html" {
        PageType::Home
    } else if path.contains("/match/") || path.contains("/fixture/") {
        PageType::Match
    } else if path.contains("/live/") {
        PageType::Live
    } else if path.contains("/news/") || path.contains("/article/") {
        PageType::Article
    } else {
        PageType::Other
    }
}

/// Numeric id after `/match/`, `/fixture/`, `/live/` or `/article/`
pub fn reference_id(path: &str) -> Option<String> {
    REFERENCE_ID
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
