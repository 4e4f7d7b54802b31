//! Output formatting module for actstat
//!
//! This module provides formatters for displaying usage data in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```no_run
//! use actstat::output::get_formatter;
//! use actstat::report;
//!
//! let records = Vec::new();
//! let overview = report::overview(&records);
//!
//! // Get table formatter for human-readable output
//! let formatter = get_formatter(false);
//! println!("{}", formatter.format_overview(&overview));
//!
//! // Get JSON formatter for machine-readable output
//! let json_formatter = get_formatter(true);
//! println!("{}", json_formatter.format_overview(&overview));
//! ```

use crate::aggregation::Totals;
use crate::billing_period::{BillingPeriod, DateWindow};
use crate::cost_calculator::{PriceTier, TierCostComparison, TierCostResult};
use crate::report::{Overview, RepoBreakdown, UsageReport};
use colored::Colorize;
use prettytable::{Cell, Row, Table, format, row};
use serde_json::json;
use std::collections::BTreeMap;

/// Trait for output formatters
///
/// This trait defines the interface for formatting the report views. The
/// tier slice passed to the cost methods fixes the display order; the cost
/// map itself is keyed by tier name.
///
/// # Example Implementation
///
/// ```
/// use actstat::billing_period::BillingPeriod;
/// use actstat::cost_calculator::{PriceTier, TierCostComparison};
/// use actstat::output::OutputFormatter;
/// use actstat::report::{Overview, RepoBreakdown, UsageReport};
/// use std::collections::BTreeMap;
///
/// struct CountFormatter;
///
/// impl OutputFormatter for CountFormatter {
///     fn format_overview(&self, overview: &Overview) -> String {
///         format!("{} records", overview.totals.records)
///     }
///
///     fn format_repo(&self, breakdown: &RepoBreakdown) -> String {
///         format!("{}: {} min", breakdown.repository, breakdown.total_quantity)
///     }
///
///     fn format_cost(
///         &self,
///         period: &BillingPeriod,
///         _tiers: &[PriceTier],
///         costs: &BTreeMap<String, TierCostComparison>,
///     ) -> String {
///         format!("{} tiers for {}", costs.len(), period.selected)
///     }
///
///     fn format_report(&self, report: &UsageReport, _tiers: &[PriceTier]) -> String {
///         format!("{} repositories", report.repositories.len())
///     }
/// }
/// ```
pub trait OutputFormatter {
    /// Format the account-wide overview
    fn format_overview(&self, overview: &Overview) -> String;

    /// Format one repository's detail section
    fn format_repo(&self, breakdown: &RepoBreakdown) -> String;

    /// Format the billing-period cost comparison
    fn format_cost(
        &self,
        period: &BillingPeriod,
        tiers: &[PriceTier],
        costs: &BTreeMap<String, TierCostComparison>,
    ) -> String;

    /// Format the full report
    fn format_report(&self, report: &UsageReport, tiers: &[PriceTier]) -> String;
}

/// Table formatter for human-readable output
///
/// Produces nicely formatted ASCII tables suitable for terminal display.
/// Quantities are formatted with thousands separators and costs are shown
/// with dollar signs for clarity. Cost changes are colored by direction:
/// increases red, decreases green.
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new() -> Self {
        Self
    }

    /// Format a count with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format a quantity of minutes with separators and two decimals
    fn format_quantity(quantity: f64) -> String {
        let formatted = format!("{quantity:.2}");
        let (integer, fraction) = formatted
            .split_once('.')
            .unwrap_or((formatted.as_str(), "00"));

        let mut result = String::new();
        for (count, ch) in integer.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 && ch != '-' {
                result.push(',');
            }
            result.push(ch);
        }
        let integer: String = result.chars().rev().collect();
        format!("{integer}.{fraction}")
    }

    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    /// Format a signed currency change
    fn format_currency_delta(amount: f64) -> String {
        if amount < 0.0 {
            format!("-${:.2}", -amount)
        } else {
            format!("+${amount:.2}")
        }
    }

    /// Right-aligned cell colored by change direction
    fn delta_cell(text: &str, direction: f64) -> Cell {
        let style = if direction > 0.0 {
            "rFr"
        } else if direction < 0.0 {
            "rFg"
        } else {
            "r"
        };
        Cell::new(text).style_spec(style)
    }

    fn quantity_table<'a, I>(title: &str, rows: I) -> Table
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> title, b -> "Minutes"]);

        let mut total = 0.0;
        for (label, quantity) in rows {
            table.add_row(row![label, r -> Self::format_quantity(quantity)]);
            total += quantity;
        }

        table.add_row(Row::new(vec![Cell::new(""); 2]));
        table.add_row(row![b -> "TOTAL", br -> Self::format_quantity(total)]);
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_overview(&self, overview: &Overview) -> String {
        let totals = &overview.totals;
        let mut out = String::new();

        out.push_str(&format!("{}\n", "Usage overview".bold()));
        out.push_str(&format!(
            "{} records, {} users, {} repositories, {} minutes\n\n",
            Self::format_number(totals.records as u64),
            Self::format_number(totals.users as u64),
            Self::format_number(totals.repositories as u64),
            Self::format_quantity(totals.quantity),
        ));

        out.push_str(&format!("{}\n", "Usage by user".bold()));
        let users = overview
            .by_user
            .iter()
            .map(|u| (u.username.as_str(), u.quantity));
        out.push_str(&Self::quantity_table("User", users).to_string());

        out.push_str(&format!("\n{}\n", "Usage by repository".bold()));
        let repos = overview
            .by_repository
            .iter()
            .map(|r| (r.repository.as_str(), r.quantity));
        out.push_str(&Self::quantity_table("Repository", repos).to_string());

        out.push_str(&format!("\n{}\n", "Usage by user and repository".bold()));
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "User", b -> "Repository", b -> "Minutes"]);
        for entry in &overview.by_user_and_repo {
            table.add_row(row![
                entry.username.as_str(),
                entry.repository.as_str(),
                r -> Self::format_quantity(entry.quantity)
            ]);
        }
        table.add_row(Row::new(vec![Cell::new(""); 3]));
        table.add_row(row![b -> "TOTAL", "", br -> Self::format_quantity(totals.quantity)]);
        out.push_str(&table.to_string());

        out
    }

    fn format_repo(&self, breakdown: &RepoBreakdown) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}\n",
            format!("Repository {}", breakdown.repository).bold()
        ));

        if breakdown.users.is_empty() {
            out.push_str(&format!("No usage recorded for {}\n", breakdown.repository));
            return out;
        }

        out.push_str(&format!(
            "Total: {} minutes\n\n",
            Self::format_quantity(breakdown.total_quantity)
        ));

        let workflows = breakdown.workflows.iter().map(|w| {
            let label = w.workflow.as_ref().map_or("(none)", |name| name.as_str());
            (label, w.quantity)
        });
        out.push_str(&Self::quantity_table("Workflow", workflows).to_string());

        out.push('\n');
        let mut daily = Table::new();
        daily.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        daily.set_titles(row![b -> "Date", b -> "Minutes"]);
        for day in &breakdown.daily {
            daily.add_row(row![day.date.to_string(), r -> Self::format_quantity(day.quantity)]);
        }
        daily.add_row(Row::new(vec![Cell::new(""); 2]));
        daily.add_row(
            row![b -> "TOTAL", br -> Self::format_quantity(breakdown.total_quantity)],
        );
        out.push_str(&daily.to_string());

        out.push('\n');
        let users = breakdown
            .users
            .iter()
            .map(|u| (u.username.as_str(), u.quantity));
        out.push_str(&Self::quantity_table("User", users).to_string());

        out
    }

    fn format_cost(
        &self,
        period: &BillingPeriod,
        tiers: &[PriceTier],
        costs: &BTreeMap<String, TierCostComparison>,
    ) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "Runner costs".bold()));
        out.push_str(&format!(
            "Billing period {} ({} days)\n",
            period.selected,
            period.selected.length_days()
        ));
        out.push_str(&format!("Compared with {}\n\n", period.comparison));

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Tier",
            b -> "Minutes",
            b -> "Billable",
            b -> "Cost",
            b -> "Prior Minutes",
            b -> "Prior Cost",
            b -> "Change",
            b -> "Change %"
        ]);

        let mut selected_totals = TierCostResult::default();
        let mut prior_totals = TierCostResult::default();
        let mut delta_total = 0.0;

        for tier in tiers {
            let Some(comparison) = costs.get(&tier.name) else {
                continue;
            };
            let selected = comparison.selected;
            let prior = comparison.comparison;

            selected_totals.total_units += selected.total_units;
            selected_totals.billable_units += selected.billable_units;
            selected_totals.cost += selected.cost;
            prior_totals.total_units += prior.total_units;
            prior_totals.cost += prior.cost;
            delta_total += comparison.delta_cost;

            table.add_row(Row::new(vec![
                Cell::new(&tier.name),
                Cell::new(&Self::format_quantity(selected.total_units)).style_spec("r"),
                Cell::new(&Self::format_quantity(selected.billable_units)).style_spec("r"),
                Cell::new(&Self::format_currency(selected.cost)).style_spec("r"),
                Cell::new(&Self::format_quantity(prior.total_units)).style_spec("r"),
                Cell::new(&Self::format_currency(prior.cost)).style_spec("r"),
                Self::delta_cell(
                    &Self::format_currency_delta(comparison.delta_cost),
                    comparison.delta_cost,
                ),
                Self::delta_cell(
                    &format!("{:+.2}%", comparison.delta_cost_percent),
                    comparison.delta_cost_percent,
                ),
            ]));
        }

        table.add_row(Row::new(vec![Cell::new(""); 8]));
        table.add_row(row![
            b -> "TOTAL",
            br -> Self::format_quantity(selected_totals.total_units),
            br -> Self::format_quantity(selected_totals.billable_units),
            br -> Self::format_currency(selected_totals.cost),
            br -> Self::format_quantity(prior_totals.total_units),
            br -> Self::format_currency(prior_totals.cost),
            br -> Self::format_currency_delta(delta_total),
            ""
        ]);
        out.push_str(&table.to_string());

        let net = format!("Net change: {}", Self::format_currency_delta(delta_total));
        let net = if delta_total > 0.0 {
            net.red().to_string()
        } else if delta_total < 0.0 {
            net.green().to_string()
        } else {
            net
        };
        out.push_str(&format!("{net}\n"));

        for tier in tiers {
            if tier.included_units > 0.0 {
                out.push_str(&format!(
                    "{}: {} minutes included per cycle\n",
                    tier.name,
                    Self::format_quantity(tier.included_units)
                ));
            }
        }

        out
    }

    fn format_report(&self, report: &UsageReport, tiers: &[PriceTier]) -> String {
        let mut out = String::new();
        out.push_str(&self.format_cost(&report.period, tiers, &report.tier_costs));
        out.push('\n');
        out.push_str(&self.format_overview(&report.overview));

        for breakdown in &report.repositories {
            out.push('\n');
            out.push_str(&self.format_repo(breakdown));
        }

        out
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn totals_json(totals: &Totals) -> serde_json::Value {
        json!({
            "quantity": totals.quantity,
            "records": totals.records,
            "users": totals.users,
            "repositories": totals.repositories,
        })
    }

    fn overview_json(overview: &Overview) -> serde_json::Value {
        json!({
            "totals": Self::totals_json(&overview.totals),
            "by_user": overview.by_user.iter().map(|u| json!({
                "username": u.username.as_str(),
                "quantity": u.quantity,
            })).collect::<Vec<_>>(),
            "by_repository": overview.by_repository.iter().map(|r| json!({
                "repository": r.repository.as_str(),
                "quantity": r.quantity,
            })).collect::<Vec<_>>(),
            "by_user_and_repo": overview.by_user_and_repo.iter().map(|x| json!({
                "username": x.username.as_str(),
                "repository": x.repository.as_str(),
                "quantity": x.quantity,
            })).collect::<Vec<_>>(),
        })
    }

    fn window_json(window: &DateWindow) -> serde_json::Value {
        json!({
            "start": window.start.to_string(),
            "end": window.end.to_string(),
            "length_days": window.length_days(),
        })
    }

    fn period_json(period: &BillingPeriod) -> serde_json::Value {
        json!({
            "selected": Self::window_json(&period.selected),
            "comparison": Self::window_json(&period.comparison),
        })
    }

    fn result_json(result: &TierCostResult) -> serde_json::Value {
        json!({
            "total_units": result.total_units,
            "billable_units": result.billable_units,
            "cost": result.cost,
        })
    }

    fn costs_json(costs: &BTreeMap<String, TierCostComparison>) -> serde_json::Value {
        costs
            .iter()
            .map(|(name, comparison)| {
                (
                    name.clone(),
                    json!({
                        "selected": Self::result_json(&comparison.selected),
                        "comparison": Self::result_json(&comparison.comparison),
                        "delta_units": comparison.delta_units,
                        "delta_cost": comparison.delta_cost,
                        "delta_cost_percent": comparison.delta_cost_percent,
                    }),
                )
            })
            .collect::<serde_json::Map<_, _>>()
            .into()
    }

    fn repo_json(breakdown: &RepoBreakdown) -> serde_json::Value {
        json!({
            "repository": breakdown.repository.as_str(),
            "total_quantity": breakdown.total_quantity,
            "workflows": breakdown.workflows.iter().map(|w| json!({
                "workflow": w.workflow.as_ref().map(|name| name.as_str()),
                "quantity": w.quantity,
            })).collect::<Vec<_>>(),
            "daily": breakdown.daily.iter().map(|d| json!({
                "date": d.date.to_string(),
                "quantity": d.quantity,
            })).collect::<Vec<_>>(),
            "users": breakdown.users.iter().map(|u| json!({
                "username": u.username.as_str(),
                "quantity": u.quantity,
            })).collect::<Vec<_>>(),
        })
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_overview(&self, overview: &Overview) -> String {
        serde_json::to_string_pretty(&Self::overview_json(overview)).unwrap()
    }

    fn format_repo(&self, breakdown: &RepoBreakdown) -> String {
        serde_json::to_string_pretty(&Self::repo_json(breakdown)).unwrap()
    }

    fn format_cost(
        &self,
        period: &BillingPeriod,
        _tiers: &[PriceTier],
        costs: &BTreeMap<String, TierCostComparison>,
    ) -> String {
        let output = json!({
            "period": Self::period_json(period),
            "tiers": Self::costs_json(costs),
        });

        serde_json::to_string_pretty(&output).unwrap()
    }

    fn format_report(&self, report: &UsageReport, _tiers: &[PriceTier]) -> String {
        let output = json!({
            "period": Self::period_json(&report.period),
            "tiers": Self::costs_json(&report.tier_costs),
            "overview": Self::overview_json(&report.overview),
            "repositories": report.repositories.iter().map(Self::repo_json).collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&output).unwrap()
    }
}

/// Get appropriate formatter based on JSON flag
///
/// # Arguments
///
/// * `json` - If true, returns a JSON formatter; otherwise returns a table formatter
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new())
    }
}
