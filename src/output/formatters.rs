//! Reusable formatting utilities for CLI output
//!
//! Timestamps, durations and relative times shared by the display models.

use chrono::{DateTime, Duration, Utc};

/// Absolute UTC timestamp, e.g. `2025-01-15 14:30 UTC`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Optional timestamp, `--` when absent.
pub fn format_optional_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(format_timestamp).unwrap_or_else(|| "--".to_string())
}

/// Human-readable duration.
///
/// # Example output
/// - `2h 15m` (hours, minutes)
/// - `5m 10s` (minutes, seconds)
/// - `45s` (seconds only)
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().max(0);

    if total_secs < 60 {
        format!("{}s", total_secs)
    } else if total_secs < 3600 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        if secs > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}m", mins)
        }
    } else {
        let hours = total_secs / 3600;
        let mins = (total_secs % 3600) / 60;
        if mins > 0 {
            format!("{}h {}m", hours, mins)
        } else {
            format!("{}h", hours)
        }
    }
}

/// Time since `at` as seen from `now`, e.g. "5m ago".
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);

    let seconds = elapsed.num_seconds();
    if seconds < 1 {
        return "just now".to_string();
    }
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = elapsed.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }

    at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(now()), "2025-01-15 12:00 UTC");
        assert_eq!(format_optional_timestamp(None), "--");
    }

    #[test]
    fn test_format_duration_hours() {
        assert_eq!(format_duration(Duration::seconds(3661)), "1h 1m");
        assert_eq!(format_duration(Duration::seconds(7200)), "2h");
    }

    #[test]
    fn test_format_duration_minutes() {
        assert_eq!(format_duration(Duration::seconds(125)), "2m 5s");
        assert_eq!(format_duration(Duration::seconds(60)), "1m");
    }

    #[test]
    fn test_format_duration_seconds() {
        assert_eq!(format_duration(Duration::seconds(45)), "45s");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }

    #[test]
    fn test_format_relative_time() {
        assert_eq!(format_relative_time(now(), now()), "just now");
        assert_eq!(format_relative_time(now() - Duration::seconds(30), now()), "30s ago");
        assert_eq!(format_relative_time(now() - Duration::minutes(5), now()), "5m ago");
        assert_eq!(format_relative_time(now() - Duration::hours(3), now()), "3h ago");
        assert_eq!(format_relative_time(now() - Duration::days(2), now()), "2d ago");
        assert_eq!(
            format_relative_time(now() - Duration::days(30), now()),
            "2024-12-16"
        );
    }

    #[test]
    fn test_future_time_is_just_now() {
        assert_eq!(
            format_relative_time(now() + Duration::seconds(10), now()),
            "just now"
        );
    }
}
