//! Scan report display models

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use super::common::{severity_badge, status_badge, truncate_string};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::formatters::{
    format_duration, format_optional_timestamp, format_relative_time, format_timestamp,
};
use crate::output::{Formattable, json, table};
use crate::scanner::projection::highest_severity;
use crate::scanner::{ScanStatus, Vulnerability, WebAppScan};

/// Finished scan row for the reports table.
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDisplay {
    #[tabled(rename = "SCAN ID")]
    pub id: String,

    #[tabled(rename = "TARGET")]
    pub target_url: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Score out of 100, or "N/A" for failed scans
    #[tabled(rename = "SCORE")]
    pub score: String,

    /// Highest severity found; "None" for clean scans, blank for failed ones
    #[tabled(rename = "SEVERITY")]
    pub severity: String,

    #[tabled(rename = "FINDINGS")]
    pub findings: usize,

    #[tabled(rename = "COMPLETED")]
    pub completed_at: String,
}

impl From<&WebAppScan> for ReportDisplay {
    fn from(scan: &WebAppScan) -> Self {
        let failed = scan.status == ScanStatus::Failed;
        let score = if failed {
            "N/A".to_string()
        } else {
            scan.score.to_string()
        };
        let severity = match highest_severity(&scan.vulns) {
            Some(s) => s.to_string(),
            None if failed => String::new(),
            None => "None".to_string(),
        };

        Self {
            id: scan.id.clone(),
            target_url: scan.target_url.clone(),
            status: scan.status.to_string(),
            score,
            severity,
            findings: scan.vulns.len(),
            completed_at: format_optional_timestamp(scan.completed_at),
        }
    }
}

/// Finding row in the report detail view.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FindingDisplay {
    #[tabled(rename = "SEVERITY")]
    pub severity: String,

    #[tabled(rename = "TYPE")]
    pub vuln_type: String,

    #[tabled(rename = "URL")]
    pub url: String,

    #[tabled(rename = "PAYLOAD")]
    pub payload: String,
}

impl From<&Vulnerability> for FindingDisplay {
    fn from(vuln: &Vulnerability) -> Self {
        Self {
            severity: vuln.severity.to_string(),
            vuln_type: vuln.vuln_type.clone(),
            url: vuln.url.clone(),
            payload: truncate_string(&vuln.payload, 48),
        }
    }
}

/// Full report for one scan (`report <id>`).
#[derive(Debug, Clone)]
pub struct ReportDetail {
    pub scan: WebAppScan,
    pub now: DateTime<Utc>,
}

impl ReportDetail {
    pub fn new(scan: WebAppScan, now: DateTime<Utc>) -> Self {
        Self { scan, now }
    }

    fn score_label(&self) -> String {
        match self.scan.status {
            ScanStatus::Failed => "N/A".to_string(),
            ScanStatus::Completed => format!("{}/100", self.scan.score),
            _ => "--".to_string(),
        }
    }

    fn duration_label(&self) -> String {
        match (self.scan.started_at, self.scan.completed_at) {
            (Some(start), Some(end)) => format_duration(end - start),
            _ => "--".to_string(),
        }
    }

    fn format_summary_table(&self) -> String {
        let scan = &self.scan;
        let mut out = table::format_pairs(&[
            ("Scan ID", scan.id.clone()),
            ("Target", scan.target_url.clone()),
            ("Mode", scan.scan_mode.to_string()),
            ("Auth", scan.auth_method.to_string()),
            ("Status", scan.status.to_string()),
            ("Score", self.score_label()),
            ("Submitted", format_timestamp(scan.created_at)),
            ("Completed", format_optional_timestamp(scan.completed_at)),
        ]);

        let findings: Vec<FindingDisplay> = scan.vulns.iter().map(FindingDisplay::from).collect();
        if !findings.is_empty() {
            out.push('\n');
            out.push_str(&table::format_table(&findings));
        }
        out
    }

    fn format_text(&self) -> String {
        let scan = &self.scan;
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Scan report:".bold(), scan.target_url.bold()));
        output.push_str("══════════════════════════════════════════════════════\n");
        output.push_str(&format!("ID:        {}\n", scan.id));
        output.push_str(&format!("Status:    {}\n", status_badge(scan.status)));
        output.push_str(&format!("Mode:      {} (auth: {})\n", scan.scan_mode, scan.auth_method));
        output.push_str(&format!(
            "Submitted: {} by {} on {}\n",
            format_relative_time(scan.created_at, self.now),
            scan.submitted_by,
            scan.agent_id
        ));
        output.push_str(&format!("Duration:  {}\n", self.duration_label()));
        output.push_str(&format!("Score:     {}\n", self.score_label().bold()));
        if let Some(url) = &scan.report_url {
            output.push_str(&format!("Report:    {}\n", url));
        }

        if !scan.recommendations.is_empty() {
            output.push_str("\nRecommendations\n");
            output.push_str("────────────────────────────────────────────────────\n");
            for rec in &scan.recommendations {
                output.push_str(&format!("  • {}\n", rec));
            }
        }

        output.push_str(&format!("\nVulnerabilities ({})\n", scan.vulns.len()));
        output.push_str("────────────────────────────────────────────────────\n");
        if scan.vulns.is_empty() {
            output.push_str("  No vulnerabilities found\n");
        }
        for vuln in &scan.vulns {
            output.push_str(&format!(
                "  [{}] {}\n",
                severity_badge(vuln.severity),
                vuln.vuln_type.bold()
            ));
            output.push_str(&format!("      {}\n", vuln.description));
            output.push_str(&format!("      URL:     {}\n", vuln.url));
            output.push_str(&format!("      Payload: {}\n", vuln.payload));
        }

        output
    }
}

impl Formattable for ReportDetail {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(&self.scan)?),
            OutputFormat::Table => Ok(self.format_summary_table()),
            OutputFormat::Pretty => Ok(self.format_text()),
        }
    }
}
