//! Common display utilities and helpers

use colored::{ColoredString, Colorize};

use crate::scanner::{ScanStatus, Severity};

/// Truncate string to max length with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Colored status label for pretty output
pub fn status_badge(status: ScanStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        ScanStatus::Queued => label.yellow(),
        ScanStatus::Running => label.cyan(),
        ScanStatus::Completed => label.green(),
        ScanStatus::Failed => label.red().bold(),
    }
}

/// Colored severity label for pretty output
pub fn severity_badge(severity: Severity) -> ColoredString {
    let label = severity.as_str();
    match severity {
        Severity::Critical => label.red().bold(),
        Severity::High => label.truecolor(249, 115, 22),
        Severity::Medium => label.yellow(),
        Severity::Low => label.blue(),
        Severity::Informational => label.dimmed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a longer description", 10), "a longe...");
    }

    #[test]
    fn test_badges_keep_label_text() {
        colored::control::set_override(false);
        assert_eq!(status_badge(ScanStatus::Failed).to_string(), "failed");
        assert_eq!(severity_badge(Severity::High).to_string(), "High");
    }
}
