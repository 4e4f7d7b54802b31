//! CLI interface for actstat
//!
//! This module defines the command-line interface using clap. Running with
//! no subcommand shows the account-wide overview.
//!
//! # Example
//!
//! ```bash
//! # Account-wide overview from the newest report in ~/Downloads
//! actstat
//!
//! # One repository, as JSON
//! actstat repo acme/widgets --json
//!
//! # Runner costs for an explicit billing window
//! actstat cost --since 2024-03-15 --until 2024-04-15
//! ```

use crate::billing_period::{self, BillingPeriod};
use crate::error::{ActstatError, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Analyze GitHub Actions usage reports
#[derive(Parser, Debug, Clone)]
#[command(name = "actstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Usage report CSV, or a directory to search for the newest one
    /// (defaults to the Downloads directory)
    #[arg(long, short = 'f', global = true, env = "ACTSTAT_REPORT")]
    pub file: Option<PathBuf>,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute (defaults to overview)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Arguments selecting a repository
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Repository slug in owner/name form
    #[arg(value_name = "SLUG")]
    pub slug: String,
}

/// Arguments overriding the billing window
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Billing window start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Billing window end date, exclusive (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,
}

impl WindowArgs {
    /// Resolve the overrides into a billing period anchored on `today`
    pub fn resolve(&self, today: NaiveDate) -> Result<BillingPeriod> {
        let start = self.since.as_deref().map(parse_date_arg).transpose()?;
        let end = self.until.as_deref().map(parse_date_arg).transpose()?;
        billing_period::resolve(today, start, end)
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show account-wide usage overview
    Overview,
    /// Show usage for a single repository
    Repo(RepoArgs),
    /// Show runner costs for the billing period
    Cost(WindowArgs),
    /// Show the full usage report
    Report(WindowArgs),
}

/// Parse a billing window date argument
///
/// Accepts dates in YYYY-MM-DD format only.
///
/// # Arguments
///
/// * `date_str` - Date string to parse
///
/// # Returns
///
/// A parsed `NaiveDate` or an error if the format is invalid
///
/// # Example
///
/// ```
/// use actstat::cli::parse_date_arg;
/// use chrono::Datelike;
///
/// let date = parse_date_arg("2024-01-15").unwrap();
/// assert_eq!(date.year(), 2024);
/// assert_eq!(date.day(), 15);
///
/// assert!(parse_date_arg("2024-01").is_err());
/// ```
pub fn parse_date_arg(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ActstatError::InvalidDate(date_str.to_string()))
}
