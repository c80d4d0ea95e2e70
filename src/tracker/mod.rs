//! Client-side visitor tracker
//!
//! Reports page views, heartbeats and page leaves to the admin backend's
//! tracking endpoint, keeping a visitor id in persistent storage and a
//! session id in session storage.
//!
//! # Usage
//!
//! ```rust,ignore
//! use bongdaha::tracker::{FileStorage, HttpBeacon, MemoryStorage, PageContext, Tracker};
//!
//! let tracker = Arc::new(Tracker::new(
//!     Arc::new(HttpBeacon::new("http://localhost:8080")),
//!     Arc::new(FileStorage::open("tracker.json")?),
//!     Arc::new(MemoryStorage::new()),
//!     PageContext::new("/", user_agent),
//! ));
//! tracker.track_page_view();
//! let heartbeat = tracker.start_heartbeat(DEFAULT_HEARTBEAT_INTERVAL);
//! ```

pub mod beacon;
pub mod classify;
pub mod event;
pub mod identity;
pub mod storage;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

pub use beacon::{Beacon, HttpBeacon};
pub use event::{
    ActivityStatus, EventExtras, PageContext, TrackAction, TrackEvent, VisibilityEvent,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

/// Default interval between heartbeats
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

pub struct Tracker {
    beacon: Arc<dyn Beacon>,
    local: Arc<dyn Storage>,
    session: Arc<dyn Storage>,
    page: RwLock<PageContext>,
    page_started: Mutex<Instant>,
    hidden: AtomicBool,
}

impl Tracker {
    pub fn new(
        beacon: Arc<dyn Beacon>,
        local: Arc<dyn Storage>,
        session: Arc<dyn Storage>,
        page: PageContext,
    ) -> Self {
        Self {
            beacon,
            local,
            session,
            page: RwLock::new(page),
            page_started: Mutex::new(Instant::now()),
            hidden: AtomicBool::new(false),
        }
    }

    pub fn visitor_id(&self) -> String {
        identity::visitor_id(self.local.as_ref())
    }

    pub fn session_id(&self) -> String {
        identity::session_id(self.session.as_ref())
    }

    /// Build and send one event for the current page
    pub fn track(&self, action: TrackAction, extras: EventExtras) {
        let page = self.page.read().unwrap_or_else(|e| e.into_inner()).clone();
        let event = TrackEvent::new(action, self.visitor_id(), self.session_id(), &page, extras);
        self.beacon.send(&event);
    }

    /// Seconds on the current page, rounded
    pub fn page_duration(&self) -> u64 {
        let started = *self.page_started.lock().unwrap_or_else(|e| e.into_inner());
        (started.elapsed().as_millis() as f64 / 1000.0).round() as u64
    }

    pub fn track_page_view(&self) {
        *self.page_started.lock().unwrap_or_else(|e| e.into_inner()) = Instant::now();
        self.track(TrackAction::Pageview, EventExtras::default());
    }

    pub fn track_leave(&self) {
        self.track(
            TrackAction::Leave,
            EventExtras {
                duration: Some(self.page_duration()),
                ..Default::default()
            },
        );
    }

    /// Periodic keep-alive carrying duration and activity status
    pub fn heartbeat(&self) {
        let status = if self.hidden.load(Ordering::Relaxed) {
            ActivityStatus::Inactive
        } else {
            ActivityStatus::Active
        };
        self.track(
            TrackAction::Heartbeat,
            EventExtras {
                duration: Some(self.page_duration()),
                status: Some(status),
                event: None,
            },
        );
    }

    /// Page became hidden or visible again
    pub fn set_visibility(&self, hidden: bool) {
        self.hidden.store(hidden, Ordering::Relaxed);
        let event = if hidden {
            VisibilityEvent::VisibilityHidden
        } else {
            VisibilityEvent::VisibilityVisible
        };
        self.track(
            TrackAction::Heartbeat,
            EventExtras {
                duration: Some(self.page_duration()),
                status: None,
                event: Some(event),
            },
        );
    }

    /// In-app navigation: leave the current page, then view the new one
    pub fn navigate(&self, path: impl Into<String>) {
        self.track_leave();
        {
            let mut page = self.page.write().unwrap_or_else(|e| e.into_inner());
            let previous = std::mem::replace(&mut page.path, path.into());
            page.referrer = Some(previous);
        }
        self.track_page_view();
    }

    /// Send a heartbeat every `interval` until the handle is stopped or dropped
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_heartbeat(self: &Arc<Self>, interval: Duration) -> HeartbeatHandle {
        let tracker = Arc::clone(self);
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                tracker.heartbeat();
            }
        });
        HeartbeatHandle { task }
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("page", &self.page)
            .field("hidden", &self.hidden)
            .finish()
    }
}

/// Running heartbeat timer
#[derive(Debug)]
pub struct HeartbeatHandle {
    task: JoinHandle<()>,
}

impl HeartbeatHandle {
    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for HeartbeatHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingBeacon {
        events: Mutex<Vec<TrackEvent>>,
    }

    impl RecordingBeacon {
        fn events(&self) -> Vec<TrackEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Beacon for RecordingBeacon {
        fn send(&self, event: &TrackEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn tracker_with(local: Arc<dyn Storage>) -> (Arc<Tracker>, Arc<RecordingBeacon>) {
        let beacon = Arc::new(RecordingBeacon::default());
        let tracker = Arc::new(Tracker::new(
            beacon.clone(),
            local,
            Arc::new(MemoryStorage::new()),
            PageContext::new("/article/7", "Mozilla/5.0 (iPhone) Mobile Safari"),
        ));
        (tracker, beacon)
    }

    #[test]
    fn test_page_view_and_leave() {
        let (tracker, beacon) = tracker_with(Arc::new(MemoryStorage::new()));
        tracker.track_page_view();
        tracker.track_leave();

        let events = beacon.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, TrackAction::Pageview);
        assert_eq!(events[0].duration, None);
        assert_eq!(events[0].reference_id.as_deref(), Some("7"));
        assert_eq!(events[1].action, TrackAction::Leave);
        assert_eq!(events[1].duration, Some(0));
        assert_eq!(events[0].visitor_id, events[1].visitor_id);
        assert_eq!(events[0].session_id, events[1].session_id);
    }

    #[test]
    fn test_visibility_changes_status() {
        let (tracker, beacon) = tracker_with(Arc::new(MemoryStorage::new()));
        tracker.set_visibility(true);
        tracker.heartbeat();
        tracker.set_visibility(false);
        tracker.heartbeat();

        let events = beacon.events();
        assert_eq!(events[0].event, Some(VisibilityEvent::VisibilityHidden));
        assert_eq!(events[0].status, None);
        assert_eq!(events[1].status, Some(ActivityStatus::Inactive));
        assert_eq!(events[2].event, Some(VisibilityEvent::VisibilityVisible));
        assert_eq!(events[3].status, Some(ActivityStatus::Active));
        assert!(events.iter().all(|e| e.action == TrackAction::Heartbeat));
    }

    #[test]
    fn test_navigate_sends_leave_then_page_view() {
        let (tracker, beacon) = tracker_with(Arc::new(MemoryStorage::new()));
        tracker.navigate("/live/99");

        let events = beacon.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, TrackAction::Leave);
        assert_eq!(events[0].page_path, "/article/7");
        assert_eq!(events[1].action, TrackAction::Pageview);
        assert_eq!(events[1].page_path, "/live/99");
        assert_eq!(events[1].referrer.as_deref(), Some("/article/7"));
    }

    #[test]
    fn test_visitor_id_stable_across_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local.json");

        let (first, beacon) = tracker_with(Arc::new(FileStorage::open(&path).unwrap()));
        first.track_page_view();
        let first_vid = beacon.events()[0].visitor_id.clone();
        let first_sid = beacon.events()[0].session_id.clone();

        // A reload keeps local storage but starts a new session
        let (second, beacon) = tracker_with(Arc::new(FileStorage::open(&path).unwrap()));
        second.track_page_view();
        assert_eq!(beacon.events()[0].visitor_id, first_vid);
        assert_ne!(beacon.events()[0].session_id, first_sid);
        assert!(first_vid.starts_with("v_"));
    }

    #[tokio::test]
    async fn test_heartbeat_timer() {
        let (tracker, beacon) = tracker_with(Arc::new(MemoryStorage::new()));
        let handle = tracker.start_heartbeat(Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(beacon.events().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let events = beacon.events();
        assert!(!events.is_empty());
        assert!(events
            .iter()
            .all(|e| e.action == TrackAction::Heartbeat && e.status == Some(ActivityStatus::Active)));
        assert!(handle.is_running());

        handle.stop();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let stopped_at = beacon.events().len();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(beacon.events().len(), stopped_at);
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels_timer() {
        let (tracker, beacon) = tracker_with(Arc::new(MemoryStorage::new()));
        drop(tracker.start_heartbeat(Duration::from_millis(30)));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(beacon.events().is_empty());
    }
}
