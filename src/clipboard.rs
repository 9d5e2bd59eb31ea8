use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

/// Write-only clipboard access
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via arboard, opened on first use.
///
/// The handle is kept for the lifetime of the app; on X11 the copied text
/// is only served while it is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable("not initialized".into()));
        };
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// In-memory clipboard for tests and headless runs. Clones share history.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    history: Rc<RefCell<Vec<String>>>,
    fail_with: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            history: Rc::default(),
            fail_with: Some(reason.into()),
        }
    }

    pub fn last(&self) -> Option<String> {
        self.history.borrow().last().cloned()
    }

    pub fn writes(&self) -> usize {
        self.history.borrow().len()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.fail_with {
            return Err(ClipboardError::Unavailable(reason.clone()));
        }
        self.history.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_clones_share_history() {
        let observer = MemoryClipboard::new();
        let mut writer = observer.clone();

        writer.set_text("first").unwrap();
        writer.set_text("second").unwrap();

        assert_eq!(observer.writes(), 2);
        assert_eq!(observer.last().as_deref(), Some("second"));
    }

    #[test]
    fn failing_clipboard_reports_reason() {
        let mut clipboard = MemoryClipboard::failing("no display");
        let err = clipboard.set_text("x").unwrap_err();
        assert_eq!(err, ClipboardError::Unavailable("no display".into()));
        assert_eq!(err.to_string(), "clipboard unavailable: no display");
        assert_eq!(clipboard.last(), None);
    }
}
