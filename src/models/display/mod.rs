//! Display models for table, JSON and pretty output
//!
//! Display models turn scan records into CLI-friendly rows and views.

mod common;
mod dashboard;
mod queue;
mod report;
mod settings;

pub use dashboard::DashboardDisplay;
pub use queue::QueueDisplay;
pub use report::{ReportDetail, ReportDisplay};
pub use settings::SettingsDisplay;
