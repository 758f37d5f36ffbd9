//! Timer-driven scan lifecycle simulator
//!
//! Every submitted scan gets two timers measured from its creation instant:
//! a start timer (`queued -> running`) and a finish timer
//! (`running -> completed`, or `failed` when a failure rate is configured).
//! The start delay is always shorter than the finish delay, so for a given
//! scan the transitions fire in order. Timers are never cancelled; a timer
//! for a removed scan lands on a missing id and is dropped by the store.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::catalog::{self, CATALOG, VulnTemplate};
use super::models::{LifecycleEvent, ScanPatch, ScanStatus, Vulnerability};
use super::store::{ScanStore, UpdateOutcome};
use crate::config::SimulatorConfig;

/// Advice attached to scans that end in `failed`.
pub const FAILURE_RECOMMENDATION: &str =
    "Scan did not complete. Verify the target is reachable and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Start,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Timer {
    due: DateTime<Utc>,
    /// Insertion order, breaks ties between equal deadlines
    seq: u64,
    scan_id: String,
    kind: TimerKind,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A status change attempted by a fired timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub scan_id: String,
    pub status: ScanStatus,
    pub at: DateTime<Utc>,
    pub outcome: UpdateOutcome,
}

/// Fabricated outcome of a finished scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticResult {
    pub status: ScanStatus,
    pub vulns: Vec<Vulnerability>,
    pub score: u8,
    pub recommendations: Vec<String>,
}

/// Owns pending lifecycle timers and the randomness used to fabricate results.
#[derive(Debug)]
pub struct Simulator {
    config: SimulatorConfig,
    rng: ChaCha8Rng,
    timers: BinaryHeap<Reverse<Timer>>,
    next_seq: u64,
}

impl Simulator {
    pub fn new(config: SimulatorConfig, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            rng,
            timers: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Arm the start and finish timers for a scan created at `created_at`.
    pub fn schedule(&mut self, scan_id: &str, created_at: DateTime<Utc>) {
        let start = offset(created_at, self.config.start_delay_ms);
        let finish_ms = self
            .rng
            .gen_range(self.config.min_completion_ms..=self.config.max_completion_ms);
        let finish = offset(created_at, finish_ms);

        debug!(
            "Scheduling scan {}: start at +{}ms, finish at +{}ms",
            scan_id, self.config.start_delay_ms, finish_ms
        );

        self.push(scan_id, start, TimerKind::Start);
        self.push(scan_id, finish, TimerKind::Finish);
    }

    fn push(&mut self, scan_id: &str, due: DateTime<Utc>, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Reverse(Timer {
            due,
            seq,
            scan_id: scan_id.to_string(),
            kind,
        }));
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.peek().map(|Reverse(t)| t.due)
    }

    /// Number of timers that have not fired yet.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn fire_due(&mut self, store: &mut ScanStore, now: DateTime<Utc>) -> Vec<Transition> {
        let mut fired = Vec::new();

        while let Some(Reverse(timer)) = self.timers.peek() {
            if timer.due > now {
                break;
            }
            let Some(Reverse(timer)) = self.timers.pop() else {
                break;
            };

            let transition = self.fire(store, &timer);
            if transition.outcome == UpdateOutcome::NotFound {
                debug!(
                    "Timer fired for scan {} which is no longer in the store",
                    transition.scan_id
                );
            }
            fired.push(transition);
        }

        fired
    }

    /// Drive one lifecycle event for the timer's scan.
    ///
    /// The update is issued even when the scan has been removed; the store
    /// treats that as a no-op.
    fn fire(&mut self, store: &mut ScanStore, timer: &Timer) -> Transition {
        let (event, patch) = match timer.kind {
            TimerKind::Start => (
                LifecycleEvent::Start,
                ScanPatch::new(&timer.scan_id).started_at(timer.due),
            ),
            TimerKind::Finish => {
                let target_url = store
                    .get(&timer.scan_id)
                    .map(|s| s.target_url.clone())
                    .unwrap_or_default();
                let result = self.synthesize(&target_url, timer.due);
                let event = if result.status == ScanStatus::Failed {
                    LifecycleEvent::Fail
                } else {
                    LifecycleEvent::Complete
                };
                (
                    event,
                    ScanPatch::new(&timer.scan_id)
                        .completed_at(timer.due)
                        .vulns(result.vulns)
                        .score(result.score)
                        .recommendations(result.recommendations),
                )
            }
        };

        let current = store.get(&timer.scan_id).map(|s| s.status);
        let outcome = match current {
            Some(status) => match status.on_event(event) {
                Some(next) => store.update_scan(patch.status(next)),
                None => {
                    warn!(
                        "Ignoring {:?} for scan {} in state {}",
                        event, timer.scan_id, status
                    );
                    UpdateOutcome::Rejected
                }
            },
            None => store.update_scan(patch.status(event.target())),
        };

        Transition {
            scan_id: timer.scan_id.clone(),
            status: event.target(),
            at: timer.due,
            outcome,
        }
    }

    /// Fabricate the terminal result for a scan of `target_url` finishing at `at`.
    pub fn synthesize(&mut self, target_url: &str, at: DateTime<Utc>) -> SyntheticResult {
        if self.config.failure_rate > 0.0 && self.rng.gen_bool(self.config.failure_rate) {
            return SyntheticResult {
                status: ScanStatus::Failed,
                vulns: Vec::new(),
                score: 0,
                recommendations: vec![FAILURE_RECOMMENDATION.to_string()],
            };
        }

        let vulns: Vec<Vulnerability> = self
            .sample_templates()
            .into_iter()
            .map(|t| t.instantiate(target_url, at))
            .collect();

        SyntheticResult {
            status: ScanStatus::Completed,
            score: catalog::score(&vulns),
            recommendations: catalog::recommendations(&vulns),
            vulns,
        }
    }

    /// Draw 1..=max_vulns templates with replacement, keeping the first of each id.
    fn sample_templates(&mut self) -> Vec<&'static VulnTemplate> {
        if !self.rng.gen_bool(self.config.vuln_probability) {
            return Vec::new();
        }

        let draws = self.rng.gen_range(1..=self.config.max_vulns);
        let mut picked: Vec<&'static VulnTemplate> = Vec::with_capacity(draws);
        for _ in 0..draws {
            let template = &CATALOG[self.rng.gen_range(0..CATALOG.len())];
            if !picked.iter().any(|p| p.id == template.id) {
                picked.push(template);
            }
        }
        picked
    }
}

/// `created_at + ms`, clamped to the latest representable instant.
///
/// Clamping keeps deadlines monotonic in `ms`, so a start timer never lands
/// after its finish timer.
fn offset(created_at: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .and_then(|delta| created_at.checked_add_signed(delta))
        .unwrap_or_else(|| {
            warn!("Delay of {}ms is out of range, clamping deadline", ms);
            DateTime::<Utc>::MAX_UTC
        })
}
