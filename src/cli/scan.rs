//! Scan command: submit scans and follow them to a terminal state
//!
//! Live runs sleep on the tokio timer until the next simulator deadline,
//! reading time from a [`TokioClock`] so both agree on "now".
//! `--fast` runs jump a virtual clock from deadline to deadline instead, so
//! the same lifecycle plays out without waiting.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, info};

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat, ScanArgs};
use crate::error::Result;
use crate::models::ReportDisplay;
use crate::output::Formattable;
use crate::scanner::projection::{ReportQuery, report_rows};
use crate::scanner::{
    Clock, ManualClock, ScanDetails, ScanRequest, ScanSession, ScanStatus, ScanStore, TokioClock,
};

/// How a followed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every submitted scan reached a terminal state
    Finished,
    /// Interrupted; this many in-flight scans were removed
    Cancelled(usize),
}

/// Validate every URL, then submit and follow the scans.
///
/// Nothing is submitted if any URL fails validation.
pub async fn run(opts: &GlobalOptions, args: ScanArgs) -> Result<()> {
    let details = args
        .urls
        .iter()
        .map(|url| {
            ScanRequest {
                target_url: url.clone(),
                scan_mode: args.mode,
                auth_method: args.auth,
                username: args.username.clone(),
                password: args.password.clone(),
                token: args.token.clone(),
            }
            .validate()
        })
        .collect::<std::result::Result<Vec<ScanDetails>, _>>()?;

    submit_and_follow(opts, details, args.fast, args.seed).await
}

/// Submit validated scans, drive the simulator until they settle and print
/// their reports.
pub async fn submit_and_follow(
    opts: &GlobalOptions,
    details: Vec<ScanDetails>,
    fast: bool,
    seed: Option<u64>,
) -> Result<()> {
    let manual = fast.then(|| Arc::new(ManualClock::new(Utc::now())));
    let clock: Arc<dyn Clock> = match &manual {
        Some(clock) => clock.clone(),
        None => Arc::new(TokioClock::new()),
    };

    let mut ctx = CommandContext::with_clock(opts, clock, seed)?;
    let human = ctx.format != OutputFormat::Json;

    let ids: Vec<String> = details
        .into_iter()
        .map(|d| ctx.session.add_scan(d))
        .collect();
    info!("Submitted {} scan(s)", ids.len());

    let progress = ScanProgress::new(ctx.session.store(), &ids, human);
    let outcome = follow(&mut ctx.session, manual.as_deref(), &ids, &progress).await;
    progress.clear();

    if let RunOutcome::Cancelled(count) = outcome {
        eprintln!("{} Cancelled {} scan(s)", "✗".yellow(), count);
        return Ok(());
    }

    let rows: Vec<ReportDisplay> =
        report_rows(ctx.session.store().scans(), &ReportQuery::default(), ctx.now())
            .into_iter()
            .filter(|scan| ids.contains(&scan.id))
            .map(ReportDisplay::from)
            .collect();

    rows.print(ctx.format)
}

fn all_settled(store: &ScanStore, ids: &[String]) -> bool {
    ids.iter()
        .all(|id| store.get(id).is_none_or(|scan| scan.status.is_terminal()))
}

/// Fire timers until every scan in `ids` is terminal or gone.
///
/// With a manual clock, time jumps straight to each deadline. Otherwise the
/// task sleeps, and Ctrl-C removes the scans that are still in flight.
pub async fn follow(
    session: &mut ScanSession,
    manual: Option<&ManualClock>,
    ids: &[String],
    progress: &ScanProgress,
) -> RunOutcome {
    let mut changes = session.store().subscribe();

    loop {
        if all_settled(session.store(), ids) {
            return RunOutcome::Finished;
        }
        let Some(deadline) = session.next_deadline() else {
            return RunOutcome::Finished;
        };

        match manual {
            Some(clock) => clock.set(deadline),
            None => {
                let wait = (deadline - session.now()).to_std().unwrap_or_default();
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = tokio::signal::ctrl_c() => {
                        return RunOutcome::Cancelled(cancel_in_flight(session, ids));
                    }
                }
            }
        }

        for transition in session.tick() {
            debug!(
                "Scan {} -> {} at {} ({:?})",
                transition.scan_id, transition.status, transition.at, transition.outcome
            );
        }

        if changes.has_changed().unwrap_or(false) {
            changes.borrow_and_update();
            progress.refresh(session.store());
        }
    }
}

fn cancel_in_flight(session: &mut ScanSession, ids: &[String]) -> usize {
    let in_flight: Vec<&String> = ids
        .iter()
        .filter(|id| {
            session
                .store()
                .get(id)
                .is_some_and(|scan| !scan.status.is_terminal())
        })
        .collect();

    for id in &in_flight {
        session.remove_scan(id);
    }
    info!("Cancelled {} in-flight scan(s)", in_flight.len());
    in_flight.len()
}

/// One spinner per submitted scan.
pub struct ScanProgress {
    multi: MultiProgress,
    bars: Vec<(String, ProgressBar)>,
}

impl ScanProgress {
    pub fn new(store: &ScanStore, ids: &[String], visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let multi = MultiProgress::with_draw_target(target);
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bars = ids
            .iter()
            .map(|id| {
                let bar = multi.add(ProgressBar::new_spinner());
                bar.set_style(style.clone());
                bar.set_prefix(
                    store
                        .get(id)
                        .map(|s| s.target_url.clone())
                        .unwrap_or_else(|| id.clone()),
                );
                bar.set_message(ScanStatus::Queued.as_str());
                bar.enable_steady_tick(Duration::from_millis(100));
                (id.clone(), bar)
            })
            .collect();

        Self { multi, bars }
    }

    /// Sync spinner messages with the store.
    pub fn refresh(&self, store: &ScanStore) {
        for (id, bar) in &self.bars {
            if bar.is_finished() {
                continue;
            }
            match store.get(id) {
                Some(scan) if scan.status == ScanStatus::Completed => bar.finish_with_message(
                    format!(
                        "completed, score {}/100, {} finding(s)",
                        scan.score,
                        scan.vulns.len()
                    ),
                ),
                Some(scan) if scan.status == ScanStatus::Failed => {
                    bar.abandon_with_message("failed")
                }
                Some(scan) => bar.set_message(scan.status.as_str()),
                None => bar.abandon_with_message("cancelled"),
            }
        }
    }

    pub fn clear(&self) {
        for (_, bar) in &self.bars {
            if !bar.is_finished() {
                bar.abandon();
            }
        }
        if let Err(err) = self.multi.clear() {
            debug!("Could not clear progress output: {}", err);
        }
    }
}
