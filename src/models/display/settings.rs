//! Scanner settings display model

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::ScannerSettings;
use crate::error::Result;
use crate::output::{Formattable, json, table};

#[derive(Debug, Clone, Serialize)]
pub struct SettingsDisplay {
    #[serde(flatten)]
    pub settings: ScannerSettings,
}

impl From<&ScannerSettings> for SettingsDisplay {
    fn from(settings: &ScannerSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }
}

impl SettingsDisplay {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let s = &self.settings;
        vec![
            ("Scan Concurrency Limit", s.concurrency_limit.to_string()),
            ("Rate Limit (req/s)", s.rate_limit.to_string()),
            (
                "Custom CSP Injection",
                if s.csp_enabled { "enabled" } else { "disabled" }.to_string(),
            ),
            (
                "Custom CSP Policy",
                s.csp_policy.clone().unwrap_or_else(|| "--".to_string()),
            ),
        ]
    }
}

impl Formattable for SettingsDisplay {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(json::format_json(self)?),
            OutputFormat::Table | OutputFormat::Pretty => Ok(table::format_pairs(&self.pairs())),
        }
    }
}
