//! Common test utilities and helpers for actstat tests
//!
//! This module provides reusable test utilities, mock data generators,
//! and helper functions to make testing easier and more consistent.

use actstat::types::{ACTIONS_PRODUCT, RepoSlug, UsageDate, UsageRecord, Username, WorkflowName};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Header row of a GitHub usage report export
pub const REPORT_HEADER: &str =
    "Date,Username,Repository Slug,Product,Actions Workflow,Price Per Unit ($),Quantity";

/// Common test users
pub const TEST_USERS: &[&str] = &["alice", "bob", "carol", "dave"];

/// Common test repositories
pub const TEST_REPOS: &[&str] = &[
    "acme/widgets",
    "acme/gadgets",
    "acme/docs",
    "acme/infra",
];

/// Common test workflow paths
pub const TEST_WORKFLOWS: &[&str] = &[
    ".github/workflows/ci.yml",
    ".github/workflows/deploy.yml",
    ".github/workflows/nightly.yml",
];

/// Per-minute prices of the default runner tiers
pub const TIER_PRICES: &[f64] = &[0.008, 0.016, 0.08];

/// Builder for creating test usage rows
pub struct UsageRowBuilder {
    date: String,
    username: String,
    repository: String,
    product: String,
    workflow: Option<String>,
    unit_price: f64,
    quantity: f64,
}

impl UsageRowBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            date: "2024-03-20".to_string(),
            username: TEST_USERS[0].to_string(),
            repository: TEST_REPOS[0].to_string(),
            product: ACTIONS_PRODUCT.to_string(),
            workflow: Some(TEST_WORKFLOWS[0].to_string()),
            unit_price: 0.008,
            quantity: 10.0,
        }
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.username = user.to_string();
        self
    }

    pub fn with_repository(mut self, repo: &str) -> Self {
        self.repository = repo.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_product(mut self, product: &str) -> Self {
        self.product = product.to_string();
        self
    }

    pub fn with_workflow(mut self, workflow: Option<&str>) -> Self {
        self.workflow = workflow.map(str::to_string);
        self
    }

    pub fn with_unit_price(mut self, price: f64) -> Self {
        self.unit_price = price;
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Build the UsageRecord
    pub fn build(self) -> UsageRecord {
        let workflow = self.workflow.as_deref().map(WorkflowName::from_path);
        UsageRecord {
            date: UsageDate::parse(&self.date).unwrap(),
            username: Username::new(self.username),
            repository: RepoSlug::new(self.repository),
            product: self.product,
            workflow_path: self.workflow,
            workflow,
            unit_price: self.unit_price,
            quantity: self.quantity,
        }
    }

    /// Build as a CSV row matching the report header
    #[allow(clippy::wrong_self_convention)]
    pub fn to_csv_row(self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.date,
            self.username,
            self.repository,
            self.product,
            self.workflow.unwrap_or_default(),
            self.unit_price,
            self.quantity,
        )
    }
}

impl Default for UsageRowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a usage report CSV into `dir` and return its path
pub fn write_report(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::from(REPORT_HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    std::fs::write(&path, body).unwrap();
    path
}

/// Generate rows for a date range, cycling users, repos, and tiers
pub fn generate_date_range_rows(
    start_date: NaiveDate,
    end_date: NaiveDate,
    rows_per_day: usize,
) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current_date = start_date;
    let mut day_number = 0;

    while current_date <= end_date {
        for row in 0..rows_per_day {
            let user = TEST_USERS[row % TEST_USERS.len()];
            let repo = TEST_REPOS[row % TEST_REPOS.len()];
            let workflow = TEST_WORKFLOWS[row % TEST_WORKFLOWS.len()];
            let price = TIER_PRICES[row % TIER_PRICES.len()];

            // Grow usage over time so comparisons between windows differ
            let quantity = (10.0 + row as f64) * (1.0 + day_number as f64 * 0.1);

            rows.push(
                UsageRowBuilder::new()
                    .with_date(&current_date.format("%Y-%m-%d").to_string())
                    .with_user(user)
                    .with_repository(repo)
                    .with_workflow(Some(workflow))
                    .with_unit_price(price)
                    .with_quantity(quantity)
                    .to_csv_row(),
            );
        }

        if current_date >= end_date {
            break;
        }
        current_date = current_date.succ_opt().unwrap_or(current_date);
        day_number += 1;
    }

    rows
}

/// Rows that violate the report schema, usable after a valid header
#[allow(dead_code)]
pub fn invalid_rows() -> Vec<String> {
    vec![
        // Malformed date
        "03/20/2024,alice,acme/widgets,Actions,,0.008,10".to_string(),
        // Negative unit price
        "2024-03-20,alice,acme/widgets,Actions,,-0.008,10".to_string(),
        // Negative quantity
        "2024-03-20,alice,acme/widgets,Actions,,0.008,-10".to_string(),
        // Non-numeric quantity
        "2024-03-20,alice,acme/widgets,Actions,,0.008,lots".to_string(),
    ]
}

/// Assert that two float values are approximately equal
pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() <= tolerance,
        "Values are not approximately equal: {} != {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_row_builder() {
        let record = UsageRowBuilder::new()
            .with_user("erin")
            .with_repository(TEST_REPOS[1])
            .with_workflow(Some(TEST_WORKFLOWS[1]))
            .with_quantity(25.0)
            .build();

        assert_eq!(record.username.as_str(), "erin");
        assert_eq!(record.repository.as_str(), TEST_REPOS[1]);
        assert_eq!(record.workflow.unwrap().as_str(), "deploy.yml");
        assert_eq!(record.quantity, 25.0);
    }

    #[test]
    fn test_csv_row_generation() {
        let row = UsageRowBuilder::new()
            .with_date("2024-01-05")
            .with_workflow(None)
            .with_quantity(3.5)
            .to_csv_row();

        assert_eq!(row, "2024-01-05,alice,acme/widgets,Actions,,0.008,3.5");
    }

    #[test]
    fn test_date_range_generation() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let rows = generate_date_range_rows(start, end, 2);

        // 3 days * 2 rows
        assert_eq!(rows.len(), 6);
        assert!(rows[0].starts_with("2024-01-01"));
        assert!(rows[5].starts_with("2024-01-03"));
    }

    #[test]
    fn test_approx_eq() {
        assert_approx_eq(1.0, 1.0001, 0.001);
        assert_approx_eq(100.5, 100.49, 0.1);
    }

    #[test]
    #[should_panic(expected = "Values are not approximately equal")]
    fn test_approx_eq_fails() {
        assert_approx_eq(1.0, 2.0, 0.9);
    }
}
