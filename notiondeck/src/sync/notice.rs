//! Transient notices with a fixed lifetime.
//!
//! A [`NoticeSlot`] holds at most one message. Setting a new message
//! replaces the old one and restarts the clock. Callers pass `now`
//! explicitly so expiry is deterministic under test.

use std::time::{Duration, Instant};

/// Default lifetime of a notice.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

/// Which notice channel a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational or success message.
    Success,
    /// Failure message.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    text: String,
    set_at: Instant,
}

/// A single-message channel whose content expires after a fixed window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeSlot {
    current: Option<Notice>,
    ttl: Duration,
}

impl Default for NoticeSlot {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeSlot {
    /// Creates an empty slot whose messages live for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    /// Replaces the message and restarts the window at `now`.
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            text: text.into(),
            set_at: now,
        });
    }

    /// Removes the message immediately.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Returns the message if its window has not elapsed at `now`.
    #[must_use]
    pub fn visible(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.set_at) < self.ttl)
            .map(|n| n.text.as_str())
    }

    /// Drops the message if its window has elapsed at `now`.
    ///
    /// Returns `true` if a message was dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.current.is_some() && self.visible(now).is_none() {
            self.current = None;
            true
        } else {
            false
        }
    }
}
