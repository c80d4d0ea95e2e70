//! Tracking event payload

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::classify::{self, Browser, DeviceType, Os, PageType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackAction {
    Pageview,
    Heartbeat,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityEvent {
    VisibilityHidden,
    VisibilityVisible,
}

/// What the tracker knows about the page being viewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub language: String,
}

impl PageContext {
    pub fn new(path: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            referrer: None,
            user_agent: user_agent.into(),
            screen_width: 0,
            screen_height: 0,
            language: "vi".to_string(),
        }
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        let referrer = referrer.into();
        self.referrer = (!referrer.is_empty()).then_some(referrer);
        self
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Extra fields carried by heartbeat and leave events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventExtras {
    pub duration: Option<u64>,
    pub status: Option<ActivityStatus>,
    pub event: Option<VisibilityEvent>,
}

/// JSON body posted to the admin tracking endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackEvent {
    pub action: TrackAction,
    pub visitor_id: String,
    pub session_id: String,
    pub timestamp: String,
    pub page_path: String,
    pub page_type: PageType,
    pub reference_id: Option<String>,
    pub referrer: Option<String>,
    pub device_type: DeviceType,
    pub os: Os,
    pub browser: Browser,
    pub screen_width: u32,
    pub screen_height: u32,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ActivityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<VisibilityEvent>,
}

impl TrackEvent {
    pub fn new(
        action: TrackAction,
        visitor_id: String,
        session_id: String,
        page: &PageContext,
        extras: EventExtras,
    ) -> Self {
        Self {
            action,
            visitor_id,
            session_id,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            page_path: page.path.clone(),
            page_type: classify::page_type(&page.path),
            reference_id: classify::reference_id(&page.path),
            referrer: page.referrer.clone(),
            device_type: classify::device_type(&page.user_agent),
            os: classify::os(&page.user_agent),
            browser: classify::browser(&page.user_agent),
            screen_width: page.screen_width,
            screen_height: page.screen_height,
            language: page.language.clone(),
            duration: extras.duration,
            status: extras.status,
            event: extras.event,
        }
    }
}
