//! Core domain types for actstat
//!
//! This module contains the fundamental types used throughout the actstat
//! library. These types provide strong typing for common concepts like
//! usernames, repository slugs, workflow names, and report dates.

use crate::error::{ActstatError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product column value that marks a row as Actions compute usage.
///
/// Rows with any other product (Packages, Pages, ...) are billing lines
/// outside this tool's scope and are dropped at load time.
pub const ACTIONS_PRODUCT: &str = "Actions";

/// Strongly-typed username wrapper
///
/// This ensures usernames are consistently handled throughout the application
/// and provides type safety when used as an aggregation key.
///
/// # Examples
/// ```
/// use actstat::types::Username;
///
/// let user = Username::new("octocat");
/// assert_eq!(user.as_str(), "octocat");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new Username from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strongly-typed repository slug (`owner/name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoSlug(String);

impl RepoSlug {
    /// Create a new RepoSlug
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RepoSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Workflow leaf name, derived from the raw workflow path
///
/// The usage report stores workflows as repository paths like
/// `.github/workflows/ci.yml`; only the final path segment identifies the
/// workflow for reporting purposes.
///
/// # Examples
/// ```
/// use actstat::types::WorkflowName;
///
/// let wf = WorkflowName::from_path(".github/workflows/ci.yml");
/// assert_eq!(wf.as_str(), "ci.yml");
///
/// let bare = WorkflowName::from_path("deploy.yml");
/// assert_eq!(bare.as_str(), "deploy.yml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkflowName(String);

impl WorkflowName {
    /// Create a new WorkflowName from an already-normalized name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the workflow name from a raw slash-delimited path
    pub fn from_path(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref();
        let leaf = raw.rsplit('/').next().unwrap_or(raw);
        Self(leaf.to_string())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar date of a usage row
///
/// The report carries dates without a time component, formatted as
/// `YYYY-MM-DD`. Parsing is strict: any other format is a schema violation.
///
/// # Examples
/// ```
/// use actstat::types::UsageDate;
///
/// let date = UsageDate::parse("2024-03-15").unwrap();
/// assert_eq!(date.to_string(), "2024-03-15");
/// assert!(UsageDate::parse("03/15/2024").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UsageDate(NaiveDate);

impl UsageDate {
    /// Create a new UsageDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `YYYY-MM-DD` string
    pub fn parse(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ActstatError::InvalidDate(s.to_string()))
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }
}

impl fmt::Display for UsageDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// One retained row of the usage report
///
/// Records are created once at load time and never mutated. After loading,
/// `product` always equals [`ACTIONS_PRODUCT`] and `workflow` is the leaf
/// name derived from `workflow_path` (absent when the raw value was absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Calendar date the minutes were consumed
    pub date: UsageDate,
    /// User that triggered the run
    pub username: Username,
    /// Repository the run belongs to
    pub repository: RepoSlug,
    /// Billed product line, retained rows are always Actions
    pub product: String,
    /// Raw workflow path as present in the report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_path: Option<String>,
    /// Derived workflow leaf name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowName>,
    /// Price per billable unit in dollars
    pub unit_price: f64,
    /// Billable units consumed (minutes)
    pub quantity: f64,
}
