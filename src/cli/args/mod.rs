//! Shared CLI argument types
//!
//! This module contains reusable argument structs that can be flattened
//! into commands using `#[command(flatten)]`.

mod common;
mod filters;
mod global;

pub use common::{OutputFormat, SortDir};
pub use filters::ReportFilterArgs;
pub use global::GlobalOptions;
