use std::time::Duration;

pub use dioxus_primitives::toast::ToastProvider;
use dioxus_primitives::toast::{ToastOptions, Toasts};

use crate::scroller::{NoticeLevel, Notifier};

/// Routes scroller notifications to the page's toast provider.
///
/// Build it at component level with `consume_toast()`; the handle can then
/// be used from spawned tasks.
#[derive(Clone)]
pub struct ToastNotifier {
    toasts: Toasts,
}

impl ToastNotifier {
    pub fn new(toasts: Toasts) -> Self {
        Self { toasts }
    }
}

/// Errors stay up longer than informational toasts
fn toast_duration(level: NoticeLevel) -> Duration {
    match level {
        NoticeLevel::Info => Duration::from_secs(2),
        NoticeLevel::Warning => Duration::from_secs(3),
        NoticeLevel::Error => Duration::from_secs(5),
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        log::debug!("Toast ({:?}): {}", level, message);
        let options = ToastOptions::new()
            .duration(toast_duration(level))
            .permanent(false);
        match level {
            NoticeLevel::Info => self.toasts.info(message.to_string(), options),
            NoticeLevel::Warning => self.toasts.warning(message.to_string(), options),
            NoticeLevel::Error => self.toasts.error(message.to_string(), options),
        }
    }
}
