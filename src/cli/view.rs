//! Named views and fragment navigation
//!
//! Every screen of the dashboard is a [`View`]. Views can be opened by name
//! or by URL fragment (`#scan-queue`); anything unrecognised opens the
//! dashboard.

use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{ReportFilterArgs, dashboard, new_scan, queue, reports, settings};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    NewScan,
    ScanQueue,
    ScanReports,
    Settings,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::NewScan,
        View::ScanQueue,
        View::ScanReports,
        View::Settings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::NewScan => "new-scan",
            View::ScanQueue => "scan-queue",
            View::ScanReports => "scan-reports",
            View::Settings => "settings",
        }
    }

    /// Resolve a view name or `#fragment`, falling back to the dashboard.
    pub fn from_fragment(fragment: &str) -> Self {
        let name = fragment.trim().trim_start_matches('#');
        match Self::ALL.into_iter().find(|v| v.name() == name) {
            Some(view) => view,
            None => {
                debug!("Unknown view '{}', showing dashboard", fragment);
                View::Dashboard
            }
        }
    }

    /// Render this view.
    pub async fn open(self, opts: &GlobalOptions) -> Result<()> {
        match self {
            View::Dashboard => dashboard::run(opts),
            View::NewScan => new_scan::run(opts).await,
            View::ScanQueue => queue::run(opts),
            View::ScanReports => reports::list(opts, &ReportFilterArgs::default()),
            View::Settings => settings::show(opts),
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
