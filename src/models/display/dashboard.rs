//! Dashboard display model

use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;

use super::common::severity_badge;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::{Formattable, json, table};
use crate::scanner::projection::ScanStats;
use crate::scanner::{Severity, WebAppScan};

/// Widest bar drawn in the pretty charts
const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Summary counters, severity distribution and scans over time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDisplay {
    pub total_scans: usize,
    pub completed: usize,
    pub active: usize,
    pub failed: usize,
    /// Non-empty severity buckets only
    pub severity_distribution: Vec<SeverityCount>,
    /// Completed scans per day, oldest first
    pub scans_over_time: Vec<DayCount>,
}

impl DashboardDisplay {
    pub fn from_scans(scans: &[WebAppScan]) -> Self {
        let stats = ScanStats::from_scans(scans);

        Self {
            total_scans: stats.total,
            completed: stats.completed,
            active: stats.active,
            failed: stats.failed,
            severity_distribution: stats
                .severity_distribution()
                .into_iter()
                .map(|(severity, count)| SeverityCount { severity, count })
                .collect(),
            scans_over_time: stats
                .scans_per_day
                .iter()
                .map(|(date, count)| DayCount {
                    date: *date,
                    count: *count,
                })
                .collect(),
        }
    }

    fn counter_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Total Scans", self.total_scans.to_string()),
            ("Completed", self.completed.to_string()),
            ("Active/Queued", self.active.to_string()),
            ("Failed Scans", self.failed.to_string()),
        ]
    }

    fn format_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Security Dashboard".bold()));
        output.push_str("══════════════════════════════════════════════════════\n");
        for (label, value) in self.counter_pairs() {
            output.push_str(&format!("  {:<15} {:>5}\n", label, value.bold()));
        }

        output.push_str("\nVulnerability Severity Distribution\n");
        output.push_str("────────────────────────────────────────────────────\n");
        if self.severity_distribution.is_empty() {
            output.push_str("  No vulnerabilities found\n");
        }
        let max = self
            .severity_distribution
            .iter()
            .map(|s| s.count)
            .max()
            .unwrap_or(0);
        for bucket in &self.severity_distribution {
            output.push_str(&format!(
                "  {:<15} {} {}\n",
                severity_badge(bucket.severity),
                bar(bucket.count, max),
                bucket.count
            ));
        }

        output.push_str("\nScans Over Time\n");
        output.push_str("────────────────────────────────────────────────────\n");
        if self.scans_over_time.is_empty() {
            output.push_str("  No completed scans yet\n");
        }
        let max = self.scans_over_time.iter().map(|d| d.count).max().unwrap_or(0);
        for day in &self.scans_over_time {
            output.push_str(&format!(
                "  {:<15} {} {}\n",
                day.date.format("%b %-d").to_string(),
                bar(day.count, max),
                day.count
            ));
        }

        output
    }

    fn format_summary_table(&self) -> String {
        let mut pairs = self.counter_pairs();
        for bucket in &self.severity_distribution {
            pairs.push((bucket.severity.as_str(), bucket.count.to_string()));
        }
        table::format_pairs(&pairs)
    }
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(width)
}

impl Formattable for DashboardDisplay {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(self)?),
            OutputFormat::Table => Ok(self.format_summary_table()),
            OutputFormat::Pretty => Ok(self.format_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::demo::demo_scans;
    use chrono::{TimeZone, Utc};

    fn display() -> DashboardDisplay {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        DashboardDisplay::from_scans(&demo_scans(now))
    }

    #[test]
    fn test_dashboard_counts_demo_history() {
        let d = display();
        assert_eq!(d.total_scans, 6);
        assert_eq!(d.completed, 3);
        assert_eq!(d.active, 2);
        assert_eq!(d.failed, 1);
        assert!(d.severity_distribution.iter().all(|s| s.count > 0));
        assert_eq!(
            d.scans_over_time.iter().map(|d| d.count).sum::<usize>(),
            4
        );
        assert!(d.scans_over_time.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_dashboard_empty_store() {
        colored::control::set_override(false);
        let d = DashboardDisplay::from_scans(&[]);
        assert_eq!(d.total_scans, 0);
        let text = d.format(OutputFormat::Pretty).unwrap();
        assert!(text.contains("No vulnerabilities found"));
        assert!(text.contains("No completed scans yet"));
    }

    #[test]
    fn test_dashboard_json_field_names() {
        let json = display().format(OutputFormat::Json).unwrap();
        assert!(json.contains("\"totalScans\": 6"));
        assert!(json.contains("\"severityDistribution\""));
        assert!(json.contains("\"scansOverTime\""));
    }

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(4, 4).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1, 2).chars().count(), BAR_WIDTH / 2);
    }
}
