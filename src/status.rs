use std::time::{Duration, Instant};

/// How long a status flash stays on screen
pub const FLASH_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Copied,
    /// Clipboard write failed; the link is kept so it can be copied by hand
    CopyFailed { reason: String, link: String },
}

/// A transient status message that clears itself after [`FLASH_WINDOW`]
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Option<(Status, Instant)>,
}

impl StatusLine {
    pub fn show(&mut self, status: Status, now: Instant) {
        self.current = Some((status, now));
    }

    pub fn current(&self) -> Option<&Status> {
        self.current.as_ref().map(|(status, _)| status)
    }

    /// Drops the status once its window has passed. Returns true if it changed.
    pub fn expire(&mut self, now: Instant) -> bool {
        match &self.current {
            Some((_, shown_at)) if now.saturating_duration_since(*shown_at) >= FLASH_WINDOW => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
