//! Read-only projections over the scan collection
//!
//! Nothing here holds state; each function derives a fresh view from the
//! current store snapshot.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use super::models::{ScanStatus, Severity, Vulnerability, WebAppScan};

/// Most severe finding, or `None` when there are no findings.
pub fn highest_severity(vulns: &[Vulnerability]) -> Option<Severity> {
    vulns.iter().map(|v| v.severity).min_by_key(|s| s.rank())
}

/// Sort rank for the severity column. Scans without findings rank after
/// Informational.
fn severity_sort_rank(scan: &WebAppScan) -> usize {
    highest_severity(&scan.vulns)
        .map(Severity::rank)
        .unwrap_or(Severity::RANKING.len())
}

/// Dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub total: usize,
    pub completed: usize,
    /// Queued and running combined
    pub active: usize,
    pub failed: usize,
    /// Findings per severity, in ranking order, zero buckets included
    pub severity_counts: Vec<(Severity, usize)>,
    /// Scans per `completedAt` calendar day (UTC), oldest first
    pub scans_per_day: BTreeMap<NaiveDate, usize>,
}

impl ScanStats {
    pub fn from_scans(scans: &[WebAppScan]) -> Self {
        let mut severity_counts: Vec<(Severity, usize)> =
            Severity::RANKING.iter().map(|s| (*s, 0)).collect();
        let mut scans_per_day = BTreeMap::new();

        for scan in scans {
            for vuln in &scan.vulns {
                severity_counts[vuln.severity.rank()].1 += 1;
            }
            if let Some(completed_at) = scan.completed_at {
                *scans_per_day.entry(completed_at.date_naive()).or_insert(0) += 1;
            }
        }

        Self {
            total: scans.len(),
            completed: count_status(scans, |s| s == ScanStatus::Completed),
            active: count_status(scans, ScanStatus::is_active),
            failed: count_status(scans, |s| s == ScanStatus::Failed),
            severity_counts,
            scans_per_day,
        }
    }

    /// Severity buckets with at least one finding.
    pub fn severity_distribution(&self) -> Vec<(Severity, usize)> {
        self.severity_counts
            .iter()
            .copied()
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

fn count_status(scans: &[WebAppScan], pred: impl Fn(ScanStatus) -> bool) -> usize {
    scans.iter().filter(|s| pred(s.status)).count()
}

/// Queued and running scans, newest submission first.
pub fn queued_scans(scans: &[WebAppScan]) -> Vec<&WebAppScan> {
    let mut queued: Vec<&WebAppScan> = scans.iter().filter(|s| s.status.is_active()).collect();
    queued.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    queued
}

/// Column the reports table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportSortKey {
    TargetUrl,
    CompletedAt,
    Score,
    Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Inclusive calendar-day window on `completedAt`.
///
/// A missing `from` means the epoch; a missing `to` means today. The `to`
/// day is included through 23:59:59.999.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Concrete `[start, end]` bounds, resolving open ends against `now`.
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self
            .from
            .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let end_day = self.to.unwrap_or_else(|| now.date_naive());
        let end = Utc.from_utc_datetime(&end_day.and_time(end_of_day()));
        (start, end)
    }

    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (start, end) = self.bounds(now);
        start <= at && at <= end
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

/// Reports order when nothing else is asked for.
pub const DEFAULT_SORT: (ReportSortKey, SortOrder) = (ReportSortKey::CompletedAt, SortOrder::Desc);

/// Options for the reports view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    pub sort: Option<(ReportSortKey, SortOrder)>,
    pub range: DateRange,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            sort: Some(DEFAULT_SORT),
            range: DateRange::default(),
        }
    }
}

/// Completed and failed scans, filtered and stably sorted per `query`.
pub fn report_rows<'a>(
    scans: &'a [WebAppScan],
    query: &ReportQuery,
    now: DateTime<Utc>,
) -> Vec<&'a WebAppScan> {
    let mut rows: Vec<&WebAppScan> = scans
        .iter()
        .filter(|s| s.status.is_terminal())
        .filter(|s| {
            query.range.is_empty()
                || s.completed_at
                    .is_some_and(|at| query.range.contains(at, now))
        })
        .collect();

    if let Some((key, order)) = query.sort {
        rows.sort_by(|a, b| compare(a, b, key, order));
    }
    rows
}

fn compare(a: &WebAppScan, b: &WebAppScan, key: ReportSortKey, order: SortOrder) -> Ordering {
    match key {
        ReportSortKey::TargetUrl => order.apply(a.target_url.cmp(&b.target_url)),
        ReportSortKey::Score => order.apply(a.score.cmp(&b.score)),
        ReportSortKey::Severity => order.apply(severity_sort_rank(a).cmp(&severity_sort_rank(b))),
        // Missing timestamps go last in either direction
        ReportSortKey::CompletedAt => match (a.completed_at, b.completed_at) {
            (Some(x), Some(y)) => order.apply(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}
