//! Scan domain: records, store, lifecycle simulation and derived views

pub mod catalog;
pub mod clock;
pub mod demo;
pub mod models;
pub mod projection;
pub mod session;
pub mod simulator;
pub mod store;
pub mod submission;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use models::{AuthMethod, ScanMode, ScanStatus, Severity, Vulnerability, WebAppScan};
pub use session::ScanSession;
pub use store::ScanStore;
pub use submission::{ScanDetails, ScanRequest};
