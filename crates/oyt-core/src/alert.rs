use std::fmt::Display;

use chrono::Local;

use crate::host::PageHost;

pub const ALERT_TITLE: &str = "OYT Translation Error";
pub const ALERT_DESCRIPTION: &str =
    "An error occurred while translating. Check console for further details.";

/// `HH:MM:SS-> message`
pub fn format_entry(timestamp: &str, message: &str) -> String {
    format!("{timestamp}-> {message}")
}

/// Surface a translation failure in the page's error log and the trace log
pub fn report_error(host: &dyn PageHost, field: &str, message: impl Display) {
    let message = message.to_string();
    tracing::warn!(field, "translation failed: {message}");

    let timestamp = Local::now().format("%H:%M:%S").to_string();
    host.show_error(&format_entry(&timestamp, &message));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_layout() {
        assert_eq!(
            format_entry("12:30:05", "Reason: Invalid API key"),
            "12:30:05-> Reason: Invalid API key"
        );
    }
}
