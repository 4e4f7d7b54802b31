//! Billing window resolution
//!
//! Usage is invoiced in monthly cycles anchored to the 15th, regardless of
//! month length. This module resolves the selected reporting window (the
//! current cycle by default, or an explicit date range) and derives the
//! equal-length comparison window that immediately precedes it.
//!
//! All windows are half-open `[start, end)`. The reported `length_days` is
//! `span - 1`, matching the inclusive-end convention users expect when a
//! range is displayed, while window arithmetic always uses the actual span.
//!
//! # Examples
//!
//! ```
//! use actstat::billing_period::resolve;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
//! let period = resolve(today, None, None).unwrap();
//!
//! // Current cycle: 15th of last month through the 15th of this month
//! assert_eq!(period.selected.start, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
//! assert_eq!(period.selected.end, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
//!
//! // The comparison window ends exactly where the selection begins
//! assert_eq!(period.comparison.end, period.selected.start);
//! ```

use crate::error::{ActstatError, Result};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Day of month the billing cycle anchors to
pub const CYCLE_ANCHOR_DAY: u32 = 15;

/// Maximum look-back supported by the source report
pub const LOOKBACK_DAYS: i64 = 180;

/// A half-open date interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// First day included in the window
    pub start: NaiveDate,
    /// First day after the window
    pub end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting empty or inverted ranges
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start >= end {
            return Err(ActstatError::Validation(format!(
                "window start {start} is not before its end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Actual number of days covered by the window
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Reported "days included" value, `span_days - 1`
    pub fn length_days(&self) -> i64 {
        self.span_days() - 1
    }

    /// Whether a date falls inside the window (inclusive start, exclusive end)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// A selected window paired with its equal-length predecessor
///
/// The comparison window is contiguous with the selection: it ends on the
/// selection's start and spans the same number of days, so its last included
/// day is the day before the selection begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingPeriod {
    /// The window being reported on
    pub selected: DateWindow,
    /// The immediately preceding window of identical span
    pub comparison: DateWindow,
}

impl BillingPeriod {
    /// Derive the comparison window from a validated selection
    pub fn from_selected(selected: DateWindow) -> Self {
        let span = selected.span_days();
        let comparison = DateWindow {
            start: selected.start - Duration::days(span),
            end: selected.start,
        };
        Self {
            selected,
            comparison,
        }
    }
}

/// Compute the current billing cycle for a given "today"
///
/// The cycle runs from the 15th of a reference month to the 15th of the next
/// month; the reference month is last month once today has reached the 15th,
/// otherwise two months ago. Month arithmetic rolls over year boundaries.
pub fn default_cycle(today: NaiveDate) -> Result<DateWindow> {
    let months_back = if today.day() >= CYCLE_ANCHOR_DAY { 1 } else { 2 };
    let start = today
        .with_day(CYCLE_ANCHOR_DAY)
        .and_then(|d| d.checked_sub_months(Months::new(months_back)))
        .ok_or_else(|| {
            ActstatError::Validation(format!("cannot derive a billing cycle from {today}"))
        })?;
    let end = start
        .checked_add_months(Months::new(1))
        .ok_or_else(|| {
            ActstatError::Validation(format!("cannot derive a billing cycle from {today}"))
        })?;
    DateWindow::new(start, end)
}

/// Resolve the billing period for a report run
///
/// Missing bounds default to the current cycle's bounds. The result is
/// clamped so the selection never ends after `today` nor starts more than
/// [`LOOKBACK_DAYS`] before it, then validated and paired with its
/// comparison window.
///
/// # Errors
///
/// Returns a validation error when the clamped selection is empty, which
/// covers both inverted explicit ranges and requests entirely outside the
/// supported look-back.
pub fn resolve(
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<BillingPeriod> {
    let cycle = default_cycle(today)?;
    let start = start.unwrap_or(cycle.start);
    let end = end.unwrap_or(cycle.end);

    let floor = today - Duration::days(LOOKBACK_DAYS);
    let selected = DateWindow::new(start.max(floor), end.min(today))?;
    Ok(BillingPeriod::from_selected(selected))
}
