use std::time::Duration;

use uuid::Uuid;

/// Severity of a dismissible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A non-fatal, dismissible message. Errors stay until dismissed; the
/// rest auto-close on fixed per-severity durations.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub auto_close: bool,
    pub duration: Duration,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str, message: &str, auto_close: bool, secs: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            auto_close,
            duration: Duration::from_secs(secs),
        }
    }

    pub fn success(message: &str) -> Self {
        Self::new(NoticeKind::Success, "Success", message, true, 4)
    }

    pub fn error(message: &str, title: &str) -> Self {
        Self::new(NoticeKind::Error, title, message, false, 0)
    }

    pub fn warning(message: &str, title: &str) -> Self {
        Self::new(NoticeKind::Warning, title, message, true, 6)
    }

    pub fn info(message: &str, title: &str) -> Self {
        Self::new(NoticeKind::Info, title, message, true, 5)
    }
}

/// Notices a view has produced and the shell has not yet shown.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
}

impl NoticeQueue {
    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn dismiss(&mut self, id: Uuid) {
        self.notices.retain(|n| n.id != id);
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }
}
