//! Aggregation module for summarizing usage data
//!
//! Every view in this module is a projection of one primitive, [`group_sum`],
//! which folds record quantities into an ordered map keyed by whatever the
//! view extracts. Keeping a single fold keeps the views mutually consistent:
//! no view can disagree with another about how quantities combine, and the
//! conservation property (group totals sum to the input total) holds for all
//! of them at once.
//!
//! # Examples
//!
//! ```
//! use actstat::aggregation::{by_user, total_quantity};
//! use actstat::types::{ACTIONS_PRODUCT, RepoSlug, UsageDate, UsageRecord, Username};
//!
//! let record = UsageRecord {
//!     date: UsageDate::parse("2024-03-01").unwrap(),
//!     username: Username::new("octocat"),
//!     repository: RepoSlug::new("acme/widgets"),
//!     product: ACTIONS_PRODUCT.to_string(),
//!     workflow_path: None,
//!     workflow: None,
//!     unit_price: 0.008,
//!     quantity: 12.0,
//! };
//!
//! let records = vec![record.clone(), record];
//! assert_eq!(total_quantity(&records), 24.0);
//! assert_eq!(by_user(&records).len(), 1);
//! ```

use crate::types::{RepoSlug, UsageDate, UsageRecord, Username, WorkflowName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fold records into per-key sums
///
/// Groups records by `key` and accumulates `amount` per group. The result is
/// ordered by key, so every view derived from it iterates deterministically.
/// Keys that never occur in the input never appear in the output; there is no
/// zero-filling.
pub fn group_sum<'a, I, K, KF, AF>(records: I, key: KF, amount: AF) -> BTreeMap<K, f64>
where
    I: IntoIterator<Item = &'a UsageRecord>,
    K: Ord,
    KF: Fn(&UsageRecord) -> K,
    AF: Fn(&UsageRecord) -> f64,
{
    let mut sums: BTreeMap<K, f64> = BTreeMap::new();
    for record in records {
        *sums.entry(key(record)).or_insert(0.0) += amount(record);
    }
    sums
}

/// Per-user usage summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUsage {
    /// User that triggered the runs
    pub username: Username,
    /// Total billable units
    pub quantity: f64,
}

/// Per-repository usage summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoUsage {
    /// Repository the runs belong to
    pub repository: RepoSlug,
    /// Total billable units
    pub quantity: f64,
}

/// Usage cross-tabulated by user and repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRepoUsage {
    /// User that triggered the runs
    pub username: Username,
    /// Repository the runs belong to
    pub repository: RepoSlug,
    /// Total billable units
    pub quantity: f64,
}

/// Per-workflow usage summary within a single repository
///
/// The workflow is optional because source rows may omit it; such rows share
/// one unnamed bucket that sorts ahead of the named workflows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowUsage {
    /// Workflow leaf name, absent when the source row had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowName>,
    /// Total billable units
    pub quantity: f64,
}

/// Per-day usage summary within a single repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Calendar date of the usage
    pub date: UsageDate,
    /// Total billable units
    pub quantity: f64,
}

/// Aggregate usage by user
pub fn by_user(records: &[UsageRecord]) -> Vec<UserUsage> {
    group_sum(records, |r| r.username.clone(), |r| r.quantity)
        .into_iter()
        .map(|(username, quantity)| UserUsage { username, quantity })
        .collect()
}

/// Aggregate usage by repository
pub fn by_repository(records: &[UsageRecord]) -> Vec<RepoUsage> {
    group_sum(records, |r| r.repository.clone(), |r| r.quantity)
        .into_iter()
        .map(|(repository, quantity)| RepoUsage {
            repository,
            quantity,
        })
        .collect()
}

/// Aggregate usage by (user, repository) pairs
pub fn by_user_and_repo(records: &[UsageRecord]) -> Vec<UserRepoUsage> {
    group_sum(
        records,
        |r| (r.username.clone(), r.repository.clone()),
        |r| r.quantity,
    )
    .into_iter()
    .map(|((username, repository), quantity)| UserRepoUsage {
        username,
        repository,
        quantity,
    })
    .collect()
}

/// Aggregate one repository's usage by workflow
pub fn by_workflow(records: &[UsageRecord], repository: &RepoSlug) -> Vec<WorkflowUsage> {
    let in_repo = records.iter().filter(|r| &r.repository == repository);
    group_sum(in_repo, |r| r.workflow.clone(), |r| r.quantity)
        .into_iter()
        .map(|(workflow, quantity)| WorkflowUsage { workflow, quantity })
        .collect()
}

/// Aggregate one repository's usage by date
///
/// Dates with no usage are absent from the result rather than zero-filled,
/// matching the behavior of every other view.
pub fn by_date(records: &[UsageRecord], repository: &RepoSlug) -> Vec<DailyUsage> {
    let in_repo = records.iter().filter(|r| &r.repository == repository);
    group_sum(in_repo, |r| r.date, |r| r.quantity)
        .into_iter()
        .map(|(date, quantity)| DailyUsage { date, quantity })
        .collect()
}

/// Aggregate one repository's usage by user
pub fn by_user_in_repo(records: &[UsageRecord], repository: &RepoSlug) -> Vec<UserUsage> {
    let in_repo = records.iter().filter(|r| &r.repository == repository);
    group_sum(in_repo, |r| r.username.clone(), |r| r.quantity)
        .into_iter()
        .map(|(username, quantity)| UserUsage { username, quantity })
        .collect()
}

/// Total billable units across all records
pub fn total_quantity(records: &[UsageRecord]) -> f64 {
    group_sum(records, |_| (), |r| r.quantity)
        .into_values()
        .next()
        .unwrap_or(0.0)
}

/// Total units billed at one exact unit price
///
/// This is the keyless tier view: records at other prices are excluded, and
/// an input with no matching rows totals 0 rather than erroring.
pub fn tier_total(records: &[UsageRecord], unit_price: f64) -> f64 {
    let at_price = records.iter().filter(|r| r.unit_price == unit_price);
    group_sum(at_price, |_| (), |r| r.quantity)
        .into_values()
        .next()
        .unwrap_or(0.0)
}

/// Headline totals for a record set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Total billable units
    pub quantity: f64,
    /// Number of usage rows
    pub records: usize,
    /// Number of distinct users
    pub users: usize,
    /// Number of distinct repositories
    pub repositories: usize,
}

impl Totals {
    pub fn from_records(records: &[UsageRecord]) -> Self {
        Self {
            quantity: total_quantity(records),
            records: records.len(),
            users: group_sum(records, |r| r.username.clone(), |r| r.quantity).len(),
            repositories: group_sum(records, |r| r.repository.clone(), |r| r.quantity).len(),
        }
    }
}
