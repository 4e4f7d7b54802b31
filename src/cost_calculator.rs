//! Cost calculator module for billing-cycle costs
//!
//! Prices a record set over the two windows of a [`BillingPeriod`] and
//! derives delta metrics between them. A record belongs to a tier only when
//! its unit price equals the tier's price exactly; rows priced outside every
//! configured tier are excluded from all tier totals. That exclusion mirrors
//! the product-line filter in the loader: it is intentional filtering, not an
//! error condition.

use crate::aggregation::tier_total;
use crate::billing_period::{BillingPeriod, DateWindow};
use crate::filters::RecordFilter;
use crate::types::UsageRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A named runner class with its unit price and free allowance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTier {
    /// Tier name, e.g. "ubuntu"
    pub name: String,
    /// Price per billable unit in dollars
    pub unit_price: f64,
    /// Units included free each cycle
    pub included_units: f64,
}

impl PriceTier {
    /// Create a tier
    pub fn new(name: impl Into<String>, unit_price: f64, included_units: f64) -> Self {
        Self {
            name: name.into(),
            unit_price,
            included_units,
        }
    }
}

/// The standard GitHub-hosted runner tiers
///
/// Linux minutes carry the plan allowance; macOS and Windows runners bill
/// from the first minute at their higher per-minute rates.
pub fn default_tiers() -> Vec<PriceTier> {
    vec![
        PriceTier::new("ubuntu", 0.008, 3000.0),
        PriceTier::new("mac", 0.016, 0.0),
        PriceTier::new("windows", 0.08, 0.0),
    ]
}

/// Cost of one tier over one window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TierCostResult {
    /// Units consumed in the window
    pub total_units: f64,
    /// Units beyond the free allowance
    pub billable_units: f64,
    /// Cost in dollars
    pub cost: f64,
}

impl TierCostResult {
    /// Apply the allowance and pricing formula to a window total
    ///
    /// Totals at or under the allowance cost exactly zero.
    pub fn price_units(tier: &PriceTier, total_units: f64) -> Self {
        let billable_units = (total_units - tier.included_units).max(0.0);
        Self {
            total_units,
            billable_units,
            cost: billable_units * tier.unit_price,
        }
    }
}

/// One tier's selected-vs-comparison costs with delta metrics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierCostComparison {
    /// Costs for the selected window
    pub selected: TierCostResult,
    /// Costs for the comparison window
    pub comparison: TierCostResult,
    /// Unit change, selected minus comparison
    pub delta_units: f64,
    /// Cost change in dollars, selected minus comparison
    pub delta_cost: f64,
    /// Cost change as a percentage of the comparison cost; zero when the
    /// comparison window cost nothing
    pub delta_cost_percent: f64,
}

impl TierCostComparison {
    fn new(selected: TierCostResult, comparison: TierCostResult) -> Self {
        let delta_units = selected.total_units - comparison.total_units;
        let delta_cost = selected.cost - comparison.cost;
        let delta_cost_percent = if comparison.cost == 0.0 {
            0.0
        } else {
            (delta_cost / comparison.cost) * 100.0
        };
        Self {
            selected,
            comparison,
            delta_units,
            delta_cost,
            delta_cost_percent,
        }
    }
}

fn window_records(records: &[UsageRecord], window: DateWindow) -> Vec<UsageRecord> {
    RecordFilter::new().with_window(window).apply(records)
}

/// Price a record set over both windows of a billing period
///
/// Each tier is evaluated independently against each window; the result maps
/// tier name to its comparison. A window with no matching rows prices to
/// zero totals for every tier rather than an error.
pub fn price(
    records: &[UsageRecord],
    tiers: &[PriceTier],
    period: &BillingPeriod,
) -> BTreeMap<String, TierCostComparison> {
    let selected = window_records(records, period.selected);
    let comparison = window_records(records, period.comparison);

    let mut costs = BTreeMap::new();
    for tier in tiers {
        let current = TierCostResult::price_units(tier, tier_total(&selected, tier.unit_price));
        let prior = TierCostResult::price_units(tier, tier_total(&comparison, tier.unit_price));
        debug!(
            "Priced tier {}: {} units selected, {} units prior",
            tier.name, current.total_units, prior.total_units
        );
        costs.insert(tier.name.clone(), TierCostComparison::new(current, prior));
    }
    costs
}
