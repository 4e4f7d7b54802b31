//! End-to-end integration tests for actstat
//!
//! These tests verify complete workflows from report discovery through
//! aggregation and pricing to final output, ensuring all components work
//! together correctly.

mod common;

use actstat::{
    billing_period,
    cli::parse_date_arg,
    cost_calculator::{default_tiers, price},
    data_loader::{load_records, resolve_source},
    error::ActstatError,
    filters::RecordFilter,
    output::get_formatter,
    report,
    types::{RepoSlug, UsageRecord},
};
use chrono::NaiveDate;
use common::{TEST_REPOS, assert_approx_eq, generate_date_range_rows, write_report};
use std::path::Path;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
}

/// Write a generated report covering both windows of the billing cycle for
/// `today()`, then resolve and load it the way the commands do.
///
/// The cycle for 2024-03-20 selects 2024-02-15 to 2024-03-15 and compares
/// against 2024-01-17 onwards; the generated range covers both exactly,
/// 58 days at four rows per day.
fn setup_two_cycle_report(dir: &TempDir) -> Vec<UsageRecord> {
    let rows = generate_date_range_rows(
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
        4,
    );
    write_report(dir.path(), "usage-report.csv", &rows);

    let source = resolve_source(Some(dir.path())).unwrap();
    load_records(&source).unwrap()
}

#[test]
fn test_full_period_workflow() {
    let dir = TempDir::new().unwrap();
    let records = setup_two_cycle_report(&dir);

    // Verify we loaded the expected amount of data
    assert_eq!(records.len(), 58 * 4);

    let period = billing_period::resolve(today(), None, None).unwrap();
    assert_eq!(
        period.selected.start,
        NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
    );
    assert_eq!(
        period.comparison.start,
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
    );

    let tiers = default_tiers();
    let full = report::assemble(&records, &period, &tiers);

    // Account-wide totals cover every generated row
    assert_eq!(full.overview.totals.records, 58 * 4);
    assert_eq!(full.overview.totals.users, 4);
    assert_eq!(full.overview.totals.repositories, 4);
    assert_eq!(full.overview.by_user_and_repo.len(), 4);

    // One section per repository, in slug order
    let slugs: Vec<&str> = full
        .repositories
        .iter()
        .map(|section| section.repository.as_str())
        .collect();
    assert_eq!(
        slugs,
        vec!["acme/docs", "acme/gadgets", "acme/infra", "acme/widgets"]
    );

    // Each repository runs one workflow under one user across all 58 days
    for section in &full.repositories {
        assert_eq!(section.workflows.len(), 1);
        assert_eq!(section.users.len(), 1);
        assert_eq!(section.daily.len(), 58);

        // Verify daily usage grows over time
        let first = section.daily.first().unwrap();
        let last = section.daily.last().unwrap();
        assert!(last.quantity > first.quantity);
    }

    // Repository sections partition the account total
    let section_total: f64 = full
        .repositories
        .iter()
        .map(|section| section.total_quantity)
        .sum();
    assert_approx_eq(section_total, full.overview.totals.quantity, 1e-6);

    // All configured runner tiers are priced
    assert_eq!(full.tier_costs.len(), 3);
}

#[test]
fn test_filtering_workflow() {
    let dir = TempDir::new().unwrap();
    let records = setup_two_cycle_report(&dir);
    let period = billing_period::resolve(today(), None, None).unwrap();

    // Restrict to one repository inside the selected window
    let filter = RecordFilter::new()
        .with_repository(RepoSlug::new(TEST_REPOS[0]))
        .with_window(period.selected);
    let kept = filter.apply(&records);

    // One row per day of the 29-day window
    assert_eq!(kept.len(), 29);
    for record in &kept {
        assert_eq!(record.repository.as_str(), TEST_REPOS[0]);
        assert!(period.selected.contains(*record.date.inner()));
    }

    // Restrict to one runner tier
    let mac_rows = RecordFilter::new().with_unit_price(0.016).apply(&records);

    assert_eq!(mac_rows.len(), 58);
    for record in &mac_rows {
        assert_eq!(record.unit_price, 0.016);
        assert_eq!(record.username.as_str(), "bob");
    }

    // A breakdown built from the filtered rows only covers the window
    let breakdown = report::repo_breakdown(&kept, &RepoSlug::new(TEST_REPOS[0]));
    assert_eq!(breakdown.daily.len(), 29);
    let direct: f64 = kept.iter().map(|r| r.quantity).sum();
    assert_approx_eq(breakdown.total_quantity, direct, 1e-9);
}

#[test]
fn test_cost_calculation_workflow() {
    let dir = TempDir::new().unwrap();
    let records = setup_two_cycle_report(&dir);
    let period = billing_period::resolve(today(), None, None).unwrap();

    let tiers = default_tiers();
    let costs = price(&records, &tiers, &period);

    for tier in &tiers {
        let change = &costs[&tier.name];

        // Window totals agree with a direct sum over the loaded rows
        let direct: f64 = records
            .iter()
            .filter(|r| r.unit_price == tier.unit_price)
            .filter(|r| period.selected.contains(*r.date.inner()))
            .map(|r| r.quantity)
            .sum();
        assert_approx_eq(change.selected.total_units, direct, 1e-9);

        // Generated usage grows over time, so every tier ran hotter than
        // in the prior cycle
        assert!(change.delta_units > 0.0);
        assert!(change.selected.total_units > change.comparison.total_units);
    }

    // ubuntu stayed inside its included allowance in the prior window
    let ubuntu = &costs["ubuntu"];
    assert!(ubuntu.comparison.total_units < 3000.0);
    assert_eq!(ubuntu.comparison.billable_units, 0.0);
    assert_eq!(ubuntu.comparison.cost, 0.0);
    // A zero-cost prior window pins the percentage change to zero
    assert_eq!(ubuntu.delta_cost_percent, 0.0);

    // The selected window spills past the allowance and gets billed
    assert!(ubuntu.selected.total_units > 3000.0);
    assert!(ubuntu.selected.cost > 0.0);

    // Tiers without an allowance report a plain percentage increase
    let mac = &costs["mac"];
    assert!(mac.comparison.cost > 0.0);
    assert!(mac.delta_cost_percent > 0.0);
}

#[test]
fn test_output_format_workflow() {
    let dir = TempDir::new().unwrap();
    let records = setup_two_cycle_report(&dir);
    let period = billing_period::resolve(today(), None, None).unwrap();
    let tiers = default_tiers();
    let full = report::assemble(&records, &period, &tiers);

    // Table output carries every section with its headers
    let table = get_formatter(false).format_report(&full, &tiers);
    assert!(table.contains("Runner costs"));
    assert!(table.contains("Billing period 2024-02-15 to 2024-03-15 (28 days)"));
    assert!(table.contains("Usage overview"));
    assert!(table.contains("ubuntu"));
    assert!(table.contains("Repository acme/widgets"));
    assert!(table.contains("TOTAL"));

    // JSON output parses back with the same shape and totals
    let json = get_formatter(true).format_report(&full, &tiers);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("report JSON is valid");

    assert_eq!(parsed["overview"]["totals"]["records"], 232);
    assert_eq!(parsed["period"]["selected"]["start"], "2024-02-15");
    assert_eq!(parsed["period"]["comparison"]["start"], "2024-01-17");
    assert_eq!(parsed["repositories"].as_array().unwrap().len(), 4);
    assert!(parsed["tiers"]["ubuntu"]["selected"]["cost"].as_f64().unwrap() > 0.0);

    // Rendering twice produces identical output
    assert_eq!(json, get_formatter(true).format_report(&full, &tiers));
}

#[test]
fn test_error_handling_workflow() {
    // Malformed CLI dates are rejected up front
    assert!(parse_date_arg("not-a-date").is_err());
    assert!(parse_date_arg("2024-13-01").is_err());

    // Inverted explicit ranges fail window validation
    let result = billing_period::resolve(
        today(),
        Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
        Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
    );
    assert!(matches!(result, Err(ActstatError::Validation(_))));

    // A missing source path is reported as such
    let missing = resolve_source(Some(Path::new("/nonexistent/report.csv")));
    assert!(matches!(missing, Err(ActstatError::SourceNotFound(_))));

    // So is a directory with no report in it
    let empty = TempDir::new().unwrap();
    let no_reports = resolve_source(Some(empty.path()));
    assert!(matches!(no_reports, Err(ActstatError::SourceNotFound(_))));
}

#[test]
fn test_performance_with_large_dataset() {
    let dir = TempDir::new().unwrap();
    // Same two-cycle range at 40 rows per day
    let rows = generate_date_range_rows(
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
        40,
    );
    let path = write_report(dir.path(), "large-report.csv", &rows);

    let start = std::time::Instant::now();

    let records = load_records(&path).unwrap();
    let period = billing_period::resolve(today(), None, None).unwrap();
    let tiers = default_tiers();
    let full = report::assemble(&records, &period, &tiers);

    let duration = start.elapsed();

    // Should complete quickly even for a full two-cycle report
    assert!(
        duration.as_secs() < 1,
        "Report assembly took too long: {:?}",
        duration
    );
    assert_eq!(full.overview.totals.records, 58 * 40);
    assert_eq!(full.overview.totals.users, 4);
    assert_eq!(full.repositories.len(), 4);
}
