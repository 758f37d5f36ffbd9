//! Report commands: the finished-scans table and single-scan detail

use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, ReportFilterArgs};
use crate::error::{Error, Result};
use crate::models::{ReportDetail, ReportDisplay};
use crate::output::Formattable;
use crate::scanner::projection::report_rows;

/// List completed and failed scans with sorting and date filters
pub fn list(opts: &GlobalOptions, filters: &ReportFilterArgs) -> Result<()> {
    let query = filters.to_query()?;
    let ctx = CommandContext::new(opts)?;

    debug!("Listing reports with {:?}", query);
    let rows: Vec<ReportDisplay> = report_rows(ctx.session.store().scans(), &query, ctx.now())
        .into_iter()
        .map(ReportDisplay::from)
        .collect();

    rows.print(ctx.format)
}

/// Show score, recommendations and findings for one scan
pub fn show(opts: &GlobalOptions, scan_id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let scan = ctx
        .session
        .store()
        .get(scan_id)
        .cloned()
        .ok_or_else(|| Error::ScanNotFound(scan_id.to_string()))?;

    ReportDetail::new(scan, ctx.now()).print(ctx.format)
}
