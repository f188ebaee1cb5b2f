//! Terminal color utilities using ANSI escape codes.
//!
//! Used by the one-shot commands; the dashboard styles through ratatui.

/// ANSI color codes
pub mod codes {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";

    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_BLACK: &str = "\x1b[90m";
}

use codes::*;
use crate::status::{Badge, BadgeStyle};

/// Color a status badge the way the dashboard does.
pub fn badge(badge: &Badge) -> String {
    let color = match badge.style {
        BadgeStyle::Success => GREEN,
        BadgeStyle::Secondary => BRIGHT_BLACK,
        BadgeStyle::Danger => RED,
        BadgeStyle::Warning => YELLOW,
    };
    format!("{}{}{:<7}{}", BOLD, color, badge.label, RESET)
}

/// Color a timestamp (dim white).
pub fn timestamp(ts: &str) -> String {
    format!("{}{}{}", DIM, ts, RESET)
}

/// Color success messages (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", GREEN, text, RESET)
}

/// Color error messages (red).
pub fn error(text: &str) -> String {
    format!("{}{}{}", RED, text, RESET)
}

/// Color warning messages (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", YELLOW, text, RESET)
}

/// Color info messages (cyan).
pub fn info(text: &str) -> String {
    format!("{}{}{}", CYAN, text, RESET)
}

/// Color a label (bold).
pub fn label(text: &str) -> String {
    format!("{}{}{}", BOLD, text, RESET)
}

/// Color a number/count (bright cyan).
pub fn number(n: impl std::fmt::Display) -> String {
    format!("{}{}{}", BRIGHT_CYAN, n, RESET)
}

/// Emoji constants for consistent usage
pub mod emoji {
    pub const CHECK: &str = "✅";
    pub const PACKAGE: &str = "📦";
    pub const LINK: &str = "🔗";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProjectStatus;

    #[test]
    fn test_badge_colors_follow_style() {
        let running = badge(&Badge::for_status(ProjectStatus::Running));
        assert!(running.contains(GREEN));
        assert!(running.contains("Running"));
        assert!(running.ends_with(RESET));

        let error = badge(&Badge::for_status(ProjectStatus::Error));
        assert!(error.contains(RED));

        let unknown = badge(&Badge::for_status(ProjectStatus::Unknown));
        assert!(unknown.contains(YELLOW));
    }

    #[test]
    fn test_badge_label_is_padded() {
        let stopped = badge(&Badge::for_status(ProjectStatus::Stopped));
        assert!(stopped.contains("Stopped"));
        let error = badge(&Badge::for_status(ProjectStatus::Error));
        assert!(error.contains("Error  "));
    }

    #[test]
    fn test_timestamp_dim() {
        let text = timestamp("12:34:56");
        assert!(text.contains(DIM));
        assert!(text.contains(RESET));
    }

    #[test]
    fn test_messages_reset() {
        for text in [success("ok"), error("bad"), warning("hm"), info("fyi"), label("x")] {
            assert!(text.ends_with(RESET));
        }
    }
}
