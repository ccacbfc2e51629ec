//! Blocking browser dialogs used for confirmations and failure reports.

use std::fmt::Display;

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// `false` when the user cancels or no window is available.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Logs the failure and shows its message to the user.
pub fn report(context: &str, err: impl Display) {
    log::error!("{}: {}", context, err);
    alert(&err.to_string());
}

pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}
