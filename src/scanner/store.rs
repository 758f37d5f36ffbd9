//! In-memory scan store
//!
//! Single source of truth for every scan visible to the views. All mutation
//! goes through [`ScanStore`]; readers borrow the current snapshot and may
//! subscribe to a revision counter that bumps on every change.

use log::{debug, warn};
use tokio::sync::watch;

use super::models::{ScanPatch, WebAppScan};

/// Result of merging a patch into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record was found and updated
    Applied,
    /// No record with that id (e.g. the scan was cancelled)
    NotFound,
    /// The patch would move the status backwards or out of a terminal state
    Rejected,
}

/// Ordered, most-recent-first collection of scans.
#[derive(Debug)]
pub struct ScanStore {
    scans: Vec<WebAppScan>,
    revision: watch::Sender<u64>,
}

impl Default for ScanStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanStore {
    pub fn new() -> Self {
        Self::with_scans(Vec::new())
    }

    /// Create a store pre-populated with `scans`, kept in the given order.
    pub fn with_scans(scans: Vec<WebAppScan>) -> Self {
        let (revision, _) = watch::channel(0);
        Self { scans, revision }
    }

    /// Prepend a record. The caller is responsible for id uniqueness.
    pub fn add_scan(&mut self, scan: WebAppScan) {
        debug!("Adding scan {} for {}", scan.id, scan.target_url);
        self.scans.insert(0, scan);
        self.notify();
    }

    /// Merge `patch` into the record with the same id.
    ///
    /// Missing ids are a silent no-op. The record keeps its id and position.
    pub fn update_scan(&mut self, patch: ScanPatch) -> UpdateOutcome {
        let Some(scan) = self.scans.iter_mut().find(|s| s.id == patch.id) else {
            debug!("Ignoring update for unknown scan {}", patch.id);
            return UpdateOutcome::NotFound;
        };

        if let Some(next) = patch.status {
            if !scan.status.can_become(next) {
                warn!(
                    "Rejecting status change {} -> {} for scan {}",
                    scan.status, next, scan.id
                );
                return UpdateOutcome::Rejected;
            }
        }

        scan.merge(patch);
        self.notify();
        UpdateOutcome::Applied
    }

    /// Delete the record with `id`. Returns whether anything was removed.
    pub fn remove_scan(&mut self, id: &str) -> bool {
        let before = self.scans.len();
        self.scans.retain(|s| s.id != id);
        let removed = self.scans.len() != before;
        if removed {
            debug!("Removed scan {}", id);
            self.notify();
        }
        removed
    }

    /// Current snapshot, most recent first.
    pub fn scans(&self) -> &[WebAppScan] {
        &self.scans
    }

    pub fn get(&self, id: &str) -> Option<&WebAppScan> {
        self.scans.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.scans.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Subscribe to change notifications. The value is a revision counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    #[cfg(test)]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::models::{AuthMethod, ScanMode, ScanStatus};
    use chrono::Utc;

    fn queued(id: &str) -> WebAppScan {
        WebAppScan {
            id: id.to_string(),
            target_url: format!("https://{id}.example.com"),
            scan_mode: ScanMode::Passive,
            auth_method: AuthMethod::None,
            status: ScanStatus::Queued,
            agent_id: "agent-manual-01".to_string(),
            submitted_by: "user-1".to_string(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            vulns: vec![],
            score: 0,
            recommendations: vec![],
            report_url: None,
        }
    }

    #[test]
    fn test_add_prepends() {
        let mut store = ScanStore::new();
        store.add_scan(queued("a"));
        store.add_scan(queued("b"));

        let ids: Vec<&str> = store.scans().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_update_merges_in_place() {
        let mut store = ScanStore::with_scans(vec![queued("a"), queued("b")]);
        let now = Utc::now();

        let outcome = store.update_scan(
            ScanPatch::new("b")
                .status(ScanStatus::Running)
                .started_at(now),
        );

        assert_eq!(outcome, UpdateOutcome::Applied);
        let scan = &store.scans()[1];
        assert_eq!(scan.id, "b");
        assert_eq!(scan.status, ScanStatus::Running);
        assert_eq!(scan.started_at, Some(now));
        assert_eq!(scan.target_url, "https://b.example.com");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = ScanStore::with_scans(vec![queued("a")]);
        let before = store.revision();

        let outcome = store.update_scan(ScanPatch::new("missing").score(50));

        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn test_update_rejects_backwards_transition() {
        let mut store = ScanStore::with_scans(vec![queued("a")]);
        store.update_scan(ScanPatch::new("a").status(ScanStatus::Running));
        store.update_scan(ScanPatch::new("a").status(ScanStatus::Completed));

        let outcome = store.update_scan(ScanPatch::new("a").status(ScanStatus::Running));

        assert_eq!(outcome, UpdateOutcome::Rejected);
        assert_eq!(store.get("a").unwrap().status, ScanStatus::Completed);
    }

    #[test]
    fn test_remove() {
        let mut store = ScanStore::with_scans(vec![queued("a"), queued("b")]);
        assert!(store.remove_scan("a"));
        assert!(!store.remove_scan("a"));
        assert_eq!(store.len(), 1);
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_subscribers_see_every_mutation() {
        let mut store = ScanStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add_scan(queued("a"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);

        store.update_scan(ScanPatch::new("a").status(ScanStatus::Running));
        store.remove_scan("a");
        assert_eq!(*rx.borrow_and_update(), 3);
    }
}
