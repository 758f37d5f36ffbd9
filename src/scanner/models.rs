//! Scan and vulnerability records held by the scan store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vulnerability severity, ranked Critical > High > Medium > Low > Informational.
///
/// `Ord` follows the ranking, so `Critical` compares lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Informational,
}

impl Severity {
    /// Fixed ranking, most severe first.
    pub const RANKING: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Informational,
    ];

    /// Position in [`Severity::RANKING`]; lower is more severe.
    pub fn rank(self) -> usize {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
            Severity::Informational => 4,
        }
    }

    /// Points deducted from the security score per finding.
    pub fn penalty(self) -> u32 {
        match self {
            Severity::Critical => 40,
            Severity::High => 25,
            Severity::Medium => 15,
            Severity::Low => 5,
            Severity::Informational => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Informational => "Informational",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How aggressively the target is probed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ScanMode {
    /// Sends test payloads
    Active,
    /// Non-intrusive observation only
    #[default]
    Passive,
    /// Active scan behind a login
    Authenticated,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ScanMode::Active => "Active",
            ScanMode::Passive => "Passive",
            ScanMode::Authenticated => "Authenticated",
        })
    }
}

/// How an authenticated scan logs in.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    #[default]
    None,
    /// Username and password form
    Form,
    /// Token sent in the Authorization header
    Header,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AuthMethod::None => "none",
            AuthMethod::Form => "form",
            AuthMethod::Header => "header",
        })
    }
}

/// Lifecycle state of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

/// Inputs that advance the lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Start,
    Complete,
    Fail,
}

impl LifecycleEvent {
    /// State a scan lands in after this event.
    pub fn target(self) -> ScanStatus {
        match self {
            LifecycleEvent::Start => ScanStatus::Running,
            LifecycleEvent::Complete => ScanStatus::Completed,
            LifecycleEvent::Fail => ScanStatus::Failed,
        }
    }
}

impl ScanStatus {
    /// `completed` and `failed` accept no further events.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }

    /// Queued or running; counted together as "active".
    pub fn is_active(self) -> bool {
        matches!(self, ScanStatus::Queued | ScanStatus::Running)
    }

    /// Next state for `event`, or `None` when the event is not valid here.
    pub fn on_event(self, event: LifecycleEvent) -> Option<ScanStatus> {
        match (self, event) {
            (ScanStatus::Queued, LifecycleEvent::Start) => Some(ScanStatus::Running),
            (ScanStatus::Running, LifecycleEvent::Complete) => Some(ScanStatus::Completed),
            (ScanStatus::Running, LifecycleEvent::Fail) => Some(ScanStatus::Failed),
            _ => None,
        }
    }

    /// Whether a record may move from `self` to `next`.
    ///
    /// Staying put is allowed; everything else must be a forward step.
    pub fn can_become(self, next: ScanStatus) -> bool {
        if self == next {
            return true;
        }
        match self {
            ScanStatus::Queued => matches!(next, ScanStatus::Running | ScanStatus::Failed),
            ScanStatus::Running => next.is_terminal(),
            ScanStatus::Completed | ScanStatus::Failed => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanStatus::Queued => "queued",
            ScanStatus::Running => "running",
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding. Owned by exactly one scan and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,

    /// Vulnerability class, e.g. "SQL Injection"
    #[serde(rename = "type")]
    pub vuln_type: String,

    pub severity: Severity,

    /// Impacted URL
    pub url: String,

    /// Payload or evidence that triggered the finding
    pub payload: String,

    pub description: String,
}

/// One simulated security assessment against a target URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAppScan {
    pub id: String,
    pub target_url: String,
    pub scan_mode: ScanMode,
    pub auth_method: AuthMethod,
    pub status: ScanStatus,
    pub agent_id: String,
    pub submitted_by: String,
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub vulns: Vec<Vulnerability>,

    /// Security score 0-100, meaningful once terminal
    #[serde(default)]
    pub score: u8,

    #[serde(default)]
    pub recommendations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
}

/// Partial update merged into an existing scan, keyed by `id`.
///
/// `None` fields leave the record untouched. The id itself is never rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPatch {
    pub id: String,
    pub status: Option<ScanStatus>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub vulns: Option<Vec<Vulnerability>>,
    pub score: Option<u8>,
    pub recommendations: Option<Vec<String>>,
    pub report_url: Option<String>,
}

impl ScanPatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn status(mut self, status: ScanStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn started_at(mut self, at: DateTime<Utc>) -> Self {
        self.started_at = Some(at);
        self
    }

    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    pub fn vulns(mut self, vulns: Vec<Vulnerability>) -> Self {
        self.vulns = Some(vulns);
        self
    }

    pub fn score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }

    pub fn recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = Some(recommendations);
        self
    }
}

impl WebAppScan {
    /// Merge `patch` into this record in place.
    pub(crate) fn merge(&mut self, patch: ScanPatch) {
        let ScanPatch {
            id: _,
            status,
            started_at,
            completed_at,
            vulns,
            score,
            recommendations,
            report_url,
        } = patch;

        if let Some(status) = status {
            self.status = status;
        }
        if started_at.is_some() {
            self.started_at = started_at;
        }
        if completed_at.is_some() {
            self.completed_at = completed_at;
        }
        if let Some(vulns) = vulns {
            self.vulns = vulns;
        }
        if let Some(score) = score {
            self.score = score;
        }
        if let Some(recommendations) = recommendations {
            self.recommendations = recommendations;
        }
        if report_url.is_some() {
            self.report_url = report_url;
        }
    }
}
