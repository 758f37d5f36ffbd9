//! Scan queue display model

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::output::formatters::format_relative_time;
use crate::scanner::WebAppScan;

/// Queued or running scan row.
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDisplay {
    #[tabled(rename = "SCAN ID")]
    pub id: String,

    #[tabled(rename = "TARGET")]
    pub target_url: String,

    #[tabled(rename = "MODE")]
    pub scan_mode: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Relative submission time (e.g., "2m ago")
    #[tabled(rename = "SUBMITTED")]
    pub submitted: String,
}

impl QueueDisplay {
    pub fn new(scan: &WebAppScan, now: DateTime<Utc>) -> Self {
        Self {
            id: scan.id.clone(),
            target_url: scan.target_url.clone(),
            scan_mode: scan.scan_mode.to_string(),
            status: scan.status.to_string(),
            submitted: format_relative_time(scan.created_at, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::demo::demo_scans;
    use crate::scanner::ScanStatus;
    use chrono::TimeZone;

    #[test]
    fn test_queue_display_from_scan() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let scans = demo_scans(now);
        let running = scans
            .iter()
            .find(|s| s.status == ScanStatus::Running)
            .unwrap();

        let display = QueueDisplay::new(running, now);

        assert_eq!(display.id, running.id);
        assert_eq!(display.status, "running");
        assert_eq!(display.scan_mode, running.scan_mode.to_string());
        assert!(display.submitted.ends_with("ago"));
    }
}
