//! Filtering module for usage records
//!
//! This module provides flexible filtering capabilities for usage data,
//! supporting repository slugs, exact unit prices, and billing windows.
//!
//! # Examples
//!
//! ```
//! use actstat::billing_period::DateWindow;
//! use actstat::filters::RecordFilter;
//! use actstat::types::RepoSlug;
//! use chrono::NaiveDate;
//!
//! // Records for one repository inside the March cycle
//! let window = DateWindow::new(
//!     NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//! )
//! .unwrap();
//! let filter = RecordFilter::new()
//!     .with_repository(RepoSlug::new("acme/widgets"))
//!     .with_window(window);
//! ```

use crate::billing_period::DateWindow;
use crate::types::{RepoSlug, UsageRecord};

/// Filter configuration for usage records
///
/// Supports filtering by repository, unit price, and date window. All
/// filters are optional and can be combined for more specific queries.
#[derive(Debug, Default, Clone)]
pub struct RecordFilter {
    /// Repository slug filter
    pub repository: Option<RepoSlug>,
    /// Exact price-per-unit filter, used to select a price tier
    pub unit_price: Option<f64>,
    /// Date window filter (half-open)
    pub window: Option<DateWindow>,
}

impl RecordFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repository filter
    pub fn with_repository(mut self, repository: RepoSlug) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set the unit price filter
    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    /// Set the date window filter
    pub fn with_window(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Check if a record passes the filter
    pub fn matches(&self, record: &UsageRecord) -> bool {
        if let Some(repository) = &self.repository {
            if &record.repository != repository {
                return false;
            }
        }

        // Tier membership is an exact price match, not a tolerance
        if let Some(unit_price) = self.unit_price {
            if record.unit_price != unit_price {
                return false;
            }
        }

        if let Some(window) = &self.window {
            if !window.contains(*record.date.inner()) {
                return false;
            }
        }

        true
    }

    /// Apply the filter to a slice of records, preserving input order
    pub fn apply(&self, records: &[UsageRecord]) -> Vec<UsageRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}
