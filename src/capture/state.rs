use serde::{Deserialize, Serialize};

use crate::capture::event::{EventKind, PageSnapshot};
use crate::models::Heartbeat;
use crate::log_info;

const ENABLE_LOGS: bool = false;

/// Decide whether an event should produce a heartbeat.
///
/// Lifecycle events always do. Interaction events do when nothing has been
/// recorded yet, when the page path differs from the last heartbeat, or when
/// more than `min_interval_ms` has passed since it.
pub fn should_emit(
    last: Option<&Heartbeat>,
    event_type: &str,
    now_ms: i64,
    page_path: &str,
    min_interval_ms: i64,
) -> bool {
    if EventKind::classify(event_type) == EventKind::Lifecycle {
        return true;
    }

    match last {
        None => true,
        Some(last) => {
            last.path != page_path || last.time.saturating_add(min_interval_ms) < now_ms
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CaptureStatus {
    #[default]
    Listening,
    /// The page unloaded; further events are ignored.
    Closed,
}

/// Per-page capture state, threaded through [`CaptureState::observe`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CaptureState {
    pub status: CaptureStatus,
    pub last: Option<Heartbeat>,
    /// Minimum gap between interaction heartbeats on the same path.
    pub min_interval_ms: i64,
}

impl CaptureState {
    pub fn new(min_interval_ms: i64) -> Self {
        Self {
            status: CaptureStatus::Listening,
            last: None,
            min_interval_ms,
        }
    }

    /// Feed an event; returns the heartbeat to store, if any.
    pub fn observe(
        &mut self,
        event_type: &str,
        page: &PageSnapshot,
        now_ms: i64,
    ) -> Option<Heartbeat> {
        if self.status == CaptureStatus::Closed {
            return None;
        }

        if !should_emit(
            self.last.as_ref(),
            event_type,
            now_ms,
            &page.path,
            self.min_interval_ms,
        ) {
            return None;
        }

        let heartbeat = Heartbeat::capture(event_type, now_ms, page);
        if let Some(last) = &self.last {
            log_info!("time since last heartbeat: {}ms", now_ms - last.time);
        }

        if event_type == "unload" {
            log_info!("page unloaded, closing capture");
            self.status = CaptureStatus::Closed;
        }

        self.last = Some(heartbeat.clone());
        Some(heartbeat)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.min_interval_ms);
    }
}
