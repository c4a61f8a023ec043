use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    raised_at: Instant,
}

/// Holds at most one notice; newer notices replace older ones.
#[derive(Debug, Clone)]
pub struct Notices {
    current: Option<Notice>,
    ttl: Duration,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn raise(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.raise_at(level, message, Instant::now());
    }

    pub fn raise_at(&mut self, level: NoticeLevel, message: impl Into<String>, now: Instant) {
        self.current = Some(Notice {
            level,
            message: message.into(),
            raised_at: now,
        });
    }

    /// Returns true if a notice was showing.
    pub fn dismiss(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Drop the notice once it has outlived the ttl. Returns true if dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let stale = self
            .current
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.raised_at) >= self.ttl);
        if stale {
            self.current = None;
        }
        stale
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }
}
