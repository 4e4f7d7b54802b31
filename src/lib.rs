//! actstat - Analyze GitHub Actions usage from billing CSV exports
//!
//! This library provides functionality to:
//! - Load Actions rows from a GitHub usage report CSV
//! - Aggregate runner minutes by user, repository, workflow, and day
//! - Resolve the 15th-anchored billing period and its comparison window
//! - Price minutes against per-tier rates and the plan allowance
//! - Generate reports in table and JSON formats
//!
//! # Examples
//!
//! ```no_run
//! use actstat::billing_period;
//! use actstat::cost_calculator::default_tiers;
//! use actstat::data_loader::{load_records, resolve_source};
//! use actstat::report;
//!
//! fn main() -> actstat::Result<()> {
//!     // Locate and load the newest usage report
//!     let source = resolve_source(None)?;
//!     let records = load_records(&source)?;
//!
//!     // Price the current billing period
//!     let today = chrono::Local::now().date_naive();
//!     let period = billing_period::resolve(today, None, None)?;
//!     let report = report::assemble(&records, &period, &default_tiers());
//!
//!     println!("{} repositories", report.repositories.len());
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod billing_period;
pub mod cli;
pub mod cost_calculator;
pub mod data_loader;
pub mod error;
pub mod filters;
pub mod output;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use error::{ActstatError, Result};
pub use types::{RepoSlug, UsageDate, UsageRecord, Username, WorkflowName};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
