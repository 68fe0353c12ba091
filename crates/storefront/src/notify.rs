//! User-visible notifications ("toasts").
//!
//! Every recoverable failure and every successful cart/review/admin action
//! ends up here as a [`Notice`]. Views subscribe to the [`Notifier`] and
//! render notices however they like; nothing in the library blocks on them.

use tokio::sync::broadcast;

/// How a notice should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Transient confirmation.
    Success,
    /// Transient, non-blocking failure. The user may retry.
    Error,
    /// Blocking message that requires user action (e.g. logging in again).
    Blocking,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn blocking(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Blocking,
            message: message.into(),
        }
    }

    /// Whether the notice needs the user's attention before continuing.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(self.level, NoticeLevel::Blocking)
    }
}

/// Fan-out channel for notices.
///
/// Cheap to clone; all clones publish to the same subscribers. Notices sent
/// while nobody is subscribed are dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Notifier {
    /// Default number of notices a slow subscriber may lag behind.
    pub const DEFAULT_CAPACITY: usize = 64;

    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Subscribe to notices published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn notify(&self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "notice");
        // No subscribers is fine: the notice is simply not shown.
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notice::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notice::error(message));
    }

    pub fn blocking(&self, message: impl Into<String>) {
        self.notify(Notice::blocking(message));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
