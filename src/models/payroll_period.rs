//! Payroll period model.
//!
//! This module contains the [`PayrollPeriod`] type, the date range a
//! payroll run covers and the unit under which history is grouped.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A payroll interval bounded by inclusive start and end dates.
///
/// No ordering or overlap checks are made; a period whose end precedes its
/// start is stored and grouped like any other.
///
/// # Example
///
/// ```
/// use bar_payroll::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayrollPeriod {
    /// Creates a period from its bounds.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// The calendar month containing `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use bar_payroll::models::PayrollPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let period = PayrollPeriod::month_of(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    /// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    /// ```
    pub fn month_of(date: NaiveDate) -> Self {
        let start_date = date.with_day(1).unwrap_or(date);
        let end_date = start_date
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self {
            start_date,
            end_date,
        }
    }

    /// Checks if a given date falls within this period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
