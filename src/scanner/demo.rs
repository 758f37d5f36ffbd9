//! Seed history so a fresh session has something to look at
//!
//! Timestamps are laid out relative to `now`. Active demo scans have no
//! timers; they stay queued or running for the life of the session.

use chrono::{DateTime, Duration, Utc};

use super::catalog::{self, CATALOG};
use super::models::{AuthMethod, ScanMode, ScanStatus, WebAppScan};
use super::simulator::FAILURE_RECOMMENDATION;

struct DemoScan {
    id: &'static str,
    target_url: &'static str,
    scan_mode: ScanMode,
    auth_method: AuthMethod,
    status: ScanStatus,
    agent_id: &'static str,
    submitted_by: &'static str,
    /// Minutes before `now` the scan was submitted
    created_ago: i64,
    /// Run time in minutes, for scans that got to running
    duration: Option<i64>,
    /// Indices into the catalog
    findings: &'static [usize],
}

const DEMO_SCANS: [DemoScan; 6] = [
    DemoScan {
        id: "scan-q8v2lo",
        target_url: "https://staging.example.com",
        scan_mode: ScanMode::Active,
        auth_method: AuthMethod::None,
        status: ScanStatus::Queued,
        agent_id: "agent-ci-02",
        submitted_by: "ci-bot",
        created_ago: 1,
        duration: None,
        findings: &[],
    },
    DemoScan {
        id: "scan-h5t0ue",
        target_url: "https://api.example.io",
        scan_mode: ScanMode::Passive,
        auth_method: AuthMethod::None,
        status: ScanStatus::Running,
        agent_id: "agent-ci-01",
        submitted_by: "ci-bot",
        created_ago: 5,
        duration: None,
        findings: &[],
    },
    DemoScan {
        id: "scan-f1n6yb",
        target_url: "https://legacy.example.com",
        scan_mode: ScanMode::Active,
        auth_method: AuthMethod::None,
        status: ScanStatus::Failed,
        agent_id: "agent-ci-01",
        submitted_by: "user-2",
        created_ago: 60 * 20,
        duration: Some(4),
        findings: &[],
    },
    DemoScan {
        id: "scan-r4c8wd",
        target_url: "https://portal.example.net",
        scan_mode: ScanMode::Authenticated,
        auth_method: AuthMethod::Form,
        status: ScanStatus::Completed,
        agent_id: "agent-manual-01",
        submitted_by: "user-1",
        created_ago: 60 * 26,
        duration: Some(18),
        findings: &[2, 3],
    },
    DemoScan {
        id: "scan-p7m3zt",
        target_url: "https://blog.example.org",
        scan_mode: ScanMode::Passive,
        auth_method: AuthMethod::None,
        status: ScanStatus::Completed,
        agent_id: "agent-ci-02",
        submitted_by: "ci-bot",
        created_ago: 60 * 50,
        duration: Some(7),
        findings: &[],
    },
    DemoScan {
        id: "scan-k2x9qa",
        target_url: "https://shop.example.com",
        scan_mode: ScanMode::Active,
        auth_method: AuthMethod::None,
        status: ScanStatus::Completed,
        agent_id: "agent-manual-01",
        submitted_by: "user-1",
        created_ago: 60 * 74,
        duration: Some(12),
        findings: &[0, 1],
    },
];

impl DemoScan {
    fn build(&self, now: DateTime<Utc>) -> WebAppScan {
        let created_at = now - Duration::minutes(self.created_ago);
        let started_at = match self.status {
            ScanStatus::Queued => None,
            _ => Some(created_at + Duration::seconds(2)),
        };
        let completed_at = self.duration.map(|m| created_at + Duration::minutes(m));

        let vulns: Vec<_> = match completed_at {
            Some(at) => self
                .findings
                .iter()
                .map(|i| CATALOG[*i].instantiate(self.target_url, at))
                .collect(),
            None => Vec::new(),
        };
        let (score, recommendations) = match self.status {
            ScanStatus::Completed => (catalog::score(&vulns), catalog::recommendations(&vulns)),
            ScanStatus::Failed => (0, vec![FAILURE_RECOMMENDATION.to_string()]),
            _ => (0, Vec::new()),
        };
        let report_url = (self.status == ScanStatus::Completed)
            .then(|| format!("/reports/{}.html", self.id));

        WebAppScan {
            id: self.id.to_string(),
            target_url: self.target_url.to_string(),
            scan_mode: self.scan_mode,
            auth_method: self.auth_method,
            status: self.status,
            agent_id: self.agent_id.to_string(),
            submitted_by: self.submitted_by.to_string(),
            created_at,
            started_at,
            completed_at,
            vulns,
            score,
            recommendations,
            report_url,
        }
    }
}

/// Demo history, most recent first.
pub fn demo_scans(now: DateTime<Utc>) -> Vec<WebAppScan> {
    DEMO_SCANS.iter().map(|d| d.build(now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_demo_covers_every_status() {
        let scans = demo_scans(now());
        for status in [
            ScanStatus::Queued,
            ScanStatus::Running,
            ScanStatus::Completed,
            ScanStatus::Failed,
        ] {
            assert!(scans.iter().any(|s| s.status == status), "missing {status}");
        }
    }

    #[test]
    fn test_demo_is_most_recent_first() {
        let scans = demo_scans(now());
        assert!(scans.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_demo_terminal_scans_are_consistent() {
        for scan in demo_scans(now()) {
            if scan.status.is_terminal() {
                assert!(scan.completed_at.is_some());
                assert!(scan.completed_at.unwrap() <= now());
            } else {
                assert!(scan.completed_at.is_none());
                assert!(scan.vulns.is_empty());
            }
            if scan.status == ScanStatus::Completed {
                assert_eq!(scan.score, catalog::score(&scan.vulns));
                assert_eq!(scan.score == 100, scan.vulns.is_empty());
            }
        }
    }

    #[test]
    fn test_demo_ids_unique() {
        let scans = demo_scans(now());
        let mut ids: Vec<_> = scans.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), scans.len());
    }
}
