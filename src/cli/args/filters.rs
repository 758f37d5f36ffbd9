//! Filter argument types for CLI commands

use chrono::NaiveDate;
use clap::Args;

use super::SortDir;
use crate::error::ValidationError;
use crate::scanner::projection::{DEFAULT_SORT, DateRange, ReportQuery, ReportSortKey};

/// Sort and date filters for the reports view.
#[derive(Args, Debug, Default, Clone)]
pub struct ReportFilterArgs {
    /// Column to sort by (target-url, completed-at, score, severity)
    #[arg(long, value_enum, hide_possible_values = true)]
    pub sort_by: Option<ReportSortKey>,

    /// Sort direction (asc, desc)
    #[arg(long, value_enum, hide_possible_values = true)]
    pub sort_dir: Option<SortDir>,

    /// Only scans completed on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Only scans completed on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

fn parse_day(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

impl ReportFilterArgs {
    /// Resolve flags into a query. Unset flags keep the default
    /// (completed-at, descending).
    pub fn to_query(&self) -> Result<ReportQuery, ValidationError> {
        let from = self.from.as_deref().map(parse_day).transpose()?;
        let to = self.to.as_deref().map(parse_day).transpose()?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ValidationError::InvertedDateRange {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        }

        let (default_key, default_order) = DEFAULT_SORT;
        let sort = Some((
            self.sort_by.unwrap_or(default_key),
            self.sort_dir.map(Into::into).unwrap_or(default_order),
        ));

        Ok(ReportQuery {
            sort,
            range: DateRange { from, to },
        })
    }
}
