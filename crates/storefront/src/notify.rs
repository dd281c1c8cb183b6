//! User-facing notices.
//!
//! Sessions push a [`Notice`] for every outcome a shopper should hear about
//! (the toast of a browser storefront). Front-ends drain them after each
//! operation.

use std::collections::VecDeque;
use std::fmt;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// One message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Pending notices, oldest first.
#[derive(Debug, Default)]
pub struct Outbox {
    notices: VecDeque<Notice>,
}

impl Outbox {
    pub fn push(&mut self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "Notice");
        self.notices.push_back(notice);
    }

    /// Take every pending notice.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Most recent notice, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Notice> {
        self.notices.back()
    }
}
