//! Data loader module for discovering and parsing usage report CSVs
//!
//! GitHub serves the usage report as a CSV download, so the default source is
//! the newest `*.csv` under the platform download directory. An explicit path
//! overrides discovery: a file is used as-is, a directory is searched for its
//! newest report.
//!
//! Loading is fail-fast: a missing column, a malformed row, or an unparseable
//! date aborts the whole load. The only rows dropped silently are non-Actions
//! product lines, which the report includes but this tool does not cover.
//!
//! # Examples
//!
//! ```no_run
//! use actstat::data_loader::{load_records, resolve_source};
//!
//! # fn example() -> actstat::Result<()> {
//! let report = resolve_source(None)?;
//! let records = load_records(&report)?;
//! println!("Loaded {} usage rows", records.len());
//! # Ok(())
//! # }
//! ```

use crate::error::{ActstatError, Result};
use crate::types::{ACTIONS_PRODUCT, RepoSlug, UsageDate, UsageRecord, Username, WorkflowName};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Columns every usage report must carry, with GitHub's exact header names
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Date",
    "Username",
    "Repository Slug",
    "Product",
    "Actions Workflow",
    "Price Per Unit ($)",
    "Quantity",
];

/// One CSV row as GitHub exports it
///
/// Extra columns in the report are ignored. An empty `Actions Workflow`
/// field deserializes to `None`.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Repository Slug")]
    repository: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Actions Workflow")]
    workflow: Option<String>,
    #[serde(rename = "Price Per Unit ($)")]
    unit_price: f64,
    #[serde(rename = "Quantity")]
    quantity: f64,
}

fn validate_headers(path: &Path, headers: &csv::StringRecord) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(ActstatError::schema(
                path,
                format!("missing required column '{column}'"),
            ));
        }
    }
    Ok(())
}

/// Load and normalize the usage records from one report file
///
/// Rows whose `Product` is not `Actions` are dropped; everything else is
/// kept in file order. The workflow leaf name is derived from the raw path
/// at load time so downstream views never see path separators.
///
/// # Errors
///
/// Returns [`ActstatError::SourceNotFound`] when the file does not exist and
/// a schema error naming the offending line for malformed rows.
pub fn load_records(path: &Path) -> Result<Vec<UsageRecord>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ActstatError::SourceNotFound(path.to_path_buf()),
        _ => ActstatError::Io(e),
    })?;

    let mut reader = csv::Reader::from_reader(file);
    validate_headers(path, reader.headers()?)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for (index, row) in reader.deserialize::<RawRow>().enumerate() {
        // Header occupies line 1
        let line = index + 2;
        let raw =
            row.map_err(|e| ActstatError::schema(path, format!("line {line}: {e}")))?;

        if raw.product != ACTIONS_PRODUCT {
            dropped += 1;
            continue;
        }

        let date = UsageDate::parse(&raw.date).map_err(|_| {
            ActstatError::schema(path, format!("line {line}: invalid date '{}'", raw.date))
        })?;
        if raw.unit_price < 0.0 {
            return Err(ActstatError::schema(
                path,
                format!("line {line}: negative unit price {}", raw.unit_price),
            ));
        }
        if raw.quantity < 0.0 {
            return Err(ActstatError::schema(
                path,
                format!("line {line}: negative quantity {}", raw.quantity),
            ));
        }

        let workflow = raw.workflow.as_deref().map(WorkflowName::from_path);
        records.push(UsageRecord {
            date,
            username: Username::new(raw.username),
            repository: RepoSlug::new(raw.repository),
            product: raw.product,
            workflow_path: raw.workflow,
            workflow,
            unit_price: raw.unit_price,
            quantity: raw.quantity,
        });
    }

    debug!(
        "Loaded {} Actions records from {} ({} non-Actions rows dropped)",
        records.len(),
        path.display(),
        dropped
    );
    Ok(records)
}

/// Find usage report CSVs under a directory, newest first
///
/// Searches recursively and orders by modification time, so the report most
/// recently downloaded from GitHub comes first. Unreadable entries are
/// skipped rather than failing the whole scan.
pub fn discover_reports(dir: &Path) -> Vec<PathBuf> {
    let mut reports: Vec<(SystemTime, PathBuf)> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("csv"))
        .filter_map(|entry| {
            let modified = entry.metadata().ok()?.modified().ok()?;
            Some((modified, entry.into_path()))
        })
        .collect();

    reports.sort_by(|a, b| b.0.cmp(&a.0));
    reports.into_iter().map(|(_, path)| path).collect()
}

fn newest_report(dir: &Path) -> Result<PathBuf> {
    match discover_reports(dir).into_iter().next() {
        Some(report) => {
            debug!("Using report {}", report.display());
            Ok(report)
        }
        None => Err(ActstatError::SourceNotFound(dir.to_path_buf())),
    }
}

/// Resolve the report path for a run
///
/// An explicit file path is used as-is; an explicit directory is searched
/// for its newest report. With no path at all, the platform download
/// directory is searched the same way, falling back to `~/Downloads` when
/// the platform does not define one.
pub fn resolve_source(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) if path.is_dir() => newest_report(path),
        Some(path) => Err(ActstatError::SourceNotFound(path.to_path_buf())),
        None => {
            let downloads = dirs::download_dir()
                .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
                .ok_or(ActstatError::NoReportDirectory)?;
            newest_report(&downloads)
        }
    }
}
