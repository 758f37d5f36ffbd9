//! Fixed vulnerability catalog and result scoring
//!
//! The simulator samples from [`CATALOG`] when fabricating findings. None of
//! the templates is Informational, so a perfect score of 100 always means
//! nothing was found.

use chrono::{DateTime, Utc};

use super::models::{Severity, Vulnerability};

/// Fallback when no finding maps to specific advice.
pub const DEFAULT_RECOMMENDATION: &str = "No critical issues found. Keep software up to date.";

/// Blueprint for a fabricated finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulnTemplate {
    /// Stable template key, also the prefix of generated vulnerability ids
    pub id: &'static str,
    pub vuln_type: &'static str,
    pub severity: Severity,
    /// Path appended to the target URL for the impacted location
    pub path: &'static str,
    pub payload: &'static str,
    pub description: &'static str,
}

pub const CATALOG: [VulnTemplate; 4] = [
    VulnTemplate {
        id: "sqli",
        vuln_type: "SQL Injection",
        severity: Severity::Critical,
        path: "/login",
        payload: "username=admin' OR '1'='1' --&password=x",
        description: "User-supplied input is concatenated into a SQL query, allowing an attacker to read or modify database contents.",
    },
    VulnTemplate {
        id: "xss-reflected",
        vuln_type: "Reflected XSS",
        severity: Severity::High,
        path: "/search?q=",
        payload: "<script>alert(document.domain)</script>",
        description: "A request parameter is echoed into the response without encoding, letting an attacker run script in a victim's browser.",
    },
    VulnTemplate {
        id: "csrf-missing-token",
        vuln_type: "Cross-Site Request Forgery",
        severity: Severity::Medium,
        path: "/account/settings",
        payload: "POST /account/settings without anti-CSRF token",
        description: "State-changing form accepts requests without an anti-forgery token.",
    },
    VulnTemplate {
        id: "cookie-no-secure",
        vuln_type: "Insecure Cookie",
        severity: Severity::Low,
        path: "/",
        payload: "Set-Cookie: session=...; Path=/; HttpOnly",
        description: "Session cookie is set without the Secure attribute and may be sent over plain HTTP.",
    },
];

impl VulnTemplate {
    /// Materialize this template for `target_url`, keyed by `found_at`.
    pub fn instantiate(&self, target_url: &str, found_at: DateTime<Utc>) -> Vulnerability {
        Vulnerability {
            id: format!("{}-{}", self.id, found_at.timestamp_millis()),
            vuln_type: self.vuln_type.to_string(),
            severity: self.severity,
            url: format!("{}{}", target_url.trim_end_matches('/'), self.path),
            payload: self.payload.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// Advice keyed by vulnerability type.
fn recommendation_for(vuln_type: &str) -> Option<&'static str> {
    match vuln_type {
        "SQL Injection" => Some("Use parameterized queries."),
        "Reflected XSS" => Some("Sanitize user input before rendering."),
        _ => None,
    }
}

/// `max(0, 100 - sum of severity penalties)`.
pub fn score(vulns: &[Vulnerability]) -> u8 {
    let penalty: u32 = vulns.iter().map(|v| v.severity.penalty()).sum();
    100u32.saturating_sub(penalty) as u8
}

/// Unique advice strings in first-seen order, or the default when none apply.
pub fn recommendations(vulns: &[Vulnerability]) -> Vec<String> {
    let mut advice: Vec<String> = Vec::new();
    for rec in vulns.iter().filter_map(|v| recommendation_for(&v.vuln_type)) {
        if !advice.iter().any(|a| a == rec) {
            advice.push(rec.to_string());
        }
    }

    if advice.is_empty() {
        advice.push(DEFAULT_RECOMMENDATION.to_string());
    }
    advice
}
