//! Dashboard command implementation

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::models::DashboardDisplay;
use crate::output::Formattable;

/// Show totals, severity distribution and scans over time
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    DashboardDisplay::from_scans(ctx.session.store().scans()).print(ctx.format)
}
