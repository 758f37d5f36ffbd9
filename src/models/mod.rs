//! Display models for CLI output

pub mod display;

pub use display::{DashboardDisplay, QueueDisplay, ReportDetail, ReportDisplay, SettingsDisplay};
