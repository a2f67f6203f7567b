//! User-facing outcome reporting

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => f.write_str("success"),
            NotificationKind::Failure => f.write_str("failure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message,
        }
    }

    pub fn failure(title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: title.into(),
            message,
        }
    }
}

/// Shows command outcomes to the operator.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
