//! Scroller error types and the user-facing error channel

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollerError {
    /// The page fetcher rejected
    Fetch { page: u32, message: String },
    /// The operation needs a live view
    Disposed,
}

impl fmt::Display for ScrollerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollerError::Fetch { page, message } => {
                write!(f, "Failed to load page {}: {}", page, message)
            }
            ScrollerError::Disposed => write!(f, "Scroller has been disposed"),
        }
    }
}

impl std::error::Error for ScrollerError {}

impl ScrollerError {
    /// Short text suitable for a toast
    pub fn user_message(&self) -> String {
        match self {
            ScrollerError::Fetch { .. } => "Failed to load items. Scroll to try again.".to_string(),
            ScrollerError::Disposed => "This view is no longer active.".to_string(),
        }
    }
}

/// Severity of a user-visible notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Caller-owned channel for transient notifications (toasts)
pub trait Notifier {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Notifier that only writes to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => log::info!("{}", message),
            NoticeLevel::Warning => log::warn!("{}", message),
            NoticeLevel::Error => log::error!("{}", message),
        }
    }
}
