//! Scan queue command implementation

use log::debug;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::models::QueueDisplay;
use crate::output::Formattable;
use crate::scanner::projection::queued_scans;

/// List queued and running scans, newest first
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let now = ctx.now();

    let rows: Vec<QueueDisplay> = queued_scans(ctx.session.store().scans())
        .into_iter()
        .map(|scan| QueueDisplay::new(scan, now))
        .collect();
    debug!("{} scans in queue", rows.len());

    rows.print(ctx.format)
}
