//! Scan session: store, simulator and clock wired together
//!
//! This is the object every view and command talks to. It owns the store,
//! stamps new scans with ids and timestamps, and hands their timers to the
//! simulator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::clock::Clock;
use super::models::{ScanStatus, WebAppScan};
use super::simulator::{Simulator, Transition};
use super::store::ScanStore;
use super::submission::ScanDetails;
use crate::config::SimulatorConfig;

/// Agent recorded on manually submitted scans.
pub const MANUAL_AGENT_ID: &str = "agent-manual-01";

/// Submitter recorded on manually submitted scans.
pub const DEFAULT_SUBMITTER: &str = "user-1";

const ID_PREFIX: &str = "scan-";
const ID_LEN: usize = 6;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub struct ScanSession {
    store: ScanStore,
    simulator: Simulator,
    clock: Arc<dyn Clock>,
    id_rng: ChaCha8Rng,
}

impl ScanSession {
    /// Build a session. With `seed` set, ids and simulated results are
    /// reproducible.
    pub fn new(
        store: ScanStore,
        config: SimulatorConfig,
        clock: Arc<dyn Clock>,
        seed: Option<u64>,
    ) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        debug!("Starting scan session with seed {}", seed);

        Self {
            store,
            simulator: Simulator::new(config, ChaCha8Rng::seed_from_u64(seed)),
            clock,
            id_rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
        }
    }

    /// Create a queued scan from validated details and arm its timers.
    /// Returns the new scan id.
    pub fn add_scan(&mut self, details: ScanDetails) -> String {
        let id = self.fresh_id();
        let created_at = self.clock.now();

        self.store.add_scan(WebAppScan {
            id: id.clone(),
            target_url: details.target_url,
            scan_mode: details.scan_mode,
            auth_method: details.auth_method,
            status: ScanStatus::Queued,
            agent_id: MANUAL_AGENT_ID.to_string(),
            submitted_by: DEFAULT_SUBMITTER.to_string(),
            created_at,
            started_at: None,
            completed_at: None,
            vulns: Vec::new(),
            score: 0,
            recommendations: Vec::new(),
            report_url: None,
        });
        self.simulator.schedule(&id, created_at);

        id
    }

    /// Drop a scan. Its timers stay armed and fire into nothing.
    pub fn remove_scan(&mut self, id: &str) -> bool {
        self.store.remove_scan(id)
    }

    /// Fire every timer that is due according to the session clock.
    pub fn tick(&mut self) -> Vec<Transition> {
        let now = self.clock.now();
        self.simulator.fire_due(&mut self.store, now)
    }

    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.simulator.next_deadline()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn store(&self) -> &ScanStore {
        &self.store
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let suffix: String = (0..ID_LEN)
                .map(|_| ID_ALPHABET[self.id_rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            let id = format!("{ID_PREFIX}{suffix}");
            if !self.store.contains(&id) {
                return id;
            }
        }
    }
}
