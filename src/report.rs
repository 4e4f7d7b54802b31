//! Report assembly
//!
//! Builds the structured report consumed by the output layer: account-wide
//! aggregates, the resolved billing period with its per-tier costs, and a
//! detail section per repository. Assembly is a pure function of its inputs;
//! rendering choices live entirely in the output layer.

use crate::aggregation::{
    self, DailyUsage, RepoUsage, Totals, UserRepoUsage, UserUsage, WorkflowUsage,
};
use crate::billing_period::BillingPeriod;
use crate::cost_calculator::{PriceTier, TierCostComparison, price};
use crate::types::{RepoSlug, UsageRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Account-wide aggregates
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    /// Headline totals
    pub totals: Totals,
    /// Usage per user
    pub by_user: Vec<UserUsage>,
    /// Usage per repository
    pub by_repository: Vec<RepoUsage>,
    /// Usage cross-tabulated by user and repository
    pub by_user_and_repo: Vec<UserRepoUsage>,
}

/// Build the account-wide overview
pub fn overview(records: &[UsageRecord]) -> Overview {
    Overview {
        totals: Totals::from_records(records),
        by_user: aggregation::by_user(records),
        by_repository: aggregation::by_repository(records),
        by_user_and_repo: aggregation::by_user_and_repo(records),
    }
}

/// One repository's detail section
#[derive(Debug, Clone, Serialize)]
pub struct RepoBreakdown {
    /// The repository this section describes
    pub repository: RepoSlug,
    /// Total billable units for the repository
    pub total_quantity: f64,
    /// Usage per workflow
    pub workflows: Vec<WorkflowUsage>,
    /// Usage per day
    pub daily: Vec<DailyUsage>,
    /// Usage per user
    pub users: Vec<UserUsage>,
}

/// Build one repository's detail section
///
/// A repository absent from the record set produces empty views and a zero
/// total rather than an error.
pub fn repo_breakdown(records: &[UsageRecord], repository: &RepoSlug) -> RepoBreakdown {
    let users = aggregation::by_user_in_repo(records, repository);
    // Every row carries a user, so the user view's total is the repo total
    let total_quantity = users.iter().map(|u| u.quantity).sum();

    RepoBreakdown {
        repository: repository.clone(),
        total_quantity,
        workflows: aggregation::by_workflow(records, repository),
        daily: aggregation::by_date(records, repository),
        users,
    }
}

/// The full usage report
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    /// Account-wide aggregates
    pub overview: Overview,
    /// The billing period the costs were computed for
    pub period: BillingPeriod,
    /// Per-tier cost comparison, keyed by tier name
    pub tier_costs: BTreeMap<String, TierCostComparison>,
    /// Detail sections, one per repository in ascending slug order
    pub repositories: Vec<RepoBreakdown>,
}

/// Assemble the full report
///
/// The repository sections cover exactly the distinct repositories present
/// in the record set, in ascending slug order so repeated runs over the same
/// data produce identical reports.
pub fn assemble(
    records: &[UsageRecord],
    period: &BillingPeriod,
    tiers: &[PriceTier],
) -> UsageReport {
    let overview = overview(records);
    let repositories = overview
        .by_repository
        .iter()
        .map(|repo| repo_breakdown(records, &repo.repository))
        .collect();

    UsageReport {
        overview,
        period: *period,
        tier_costs: price(records, tiers, period),
        repositories,
    }
}
