//! Payroll history models.
//!
//! [`PayrollHistoryRecord`] is the persisted, append-only row written when a
//! payroll run is saved. [`EmployeeStats`] and [`SavedPeriod`] are derived
//! summaries built from those rows, and [`HistoryFilter`] narrows a history
//! query.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient::{
    count_or_zero, date_or_epoch, decimal_or_zero, timestamp_or_epoch, uuid_or_nil,
};

/// One employee in one saved payroll period.
///
/// Holds a snapshot of the employee's counters, the salary computed at save
/// time, and the formula's bar settings at save time. Numeric fields that
/// are missing or unusable in stored input read as zero. A missing id reads
/// as the nil UUID, and missing dates or timestamps read as the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollHistoryRecord {
    /// Unique identifier of the record.
    #[serde(default, deserialize_with = "uuid_or_nil")]
    pub id: Uuid,
    /// Start of the saved period (inclusive).
    #[serde(default, deserialize_with = "date_or_epoch")]
    pub period_start: NaiveDate,
    /// End of the saved period (inclusive).
    #[serde(default, deserialize_with = "date_or_epoch")]
    pub period_end: NaiveDate,
    /// Id of the employee at save time.
    #[serde(default)]
    pub employee_id: String,
    /// Name of the employee at save time.
    #[serde(default)]
    pub employee_name: String,
    /// Total shifts worked.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub shifts: u32,
    /// Internship shifts worked.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub internship_shifts: u32,
    /// Corkage fee credited.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub corkage_fee: Decimal,
    /// Penalties deducted.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub penalties: Decimal,
    /// Bar debt deducted.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub bar_debt: Decimal,
    /// Salary computed at save time.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_salary: Decimal,
    /// The formula's bar revenue at save time.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_bar_amount: Decimal,
    /// The formula's bar percentage at save time.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub bar_percentage: Decimal,
    /// When the record was written.
    #[serde(default, deserialize_with = "timestamp_or_epoch")]
    pub created_at: DateTime<Utc>,
}

/// Lifetime totals for one employee name across all saved periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeStats {
    /// The name the records were grouped under.
    pub employee_name: String,
    /// Sum of shifts.
    pub total_shifts: u64,
    /// Sum of internship shifts.
    pub total_internship_shifts: u64,
    /// Sum of corkage fees.
    pub total_corkage_fee: Decimal,
    /// Sum of penalties.
    pub total_penalties: Decimal,
    /// Sum of bar debts.
    pub total_bar_debt: Decimal,
    /// Sum of salaries.
    pub total_salary: Decimal,
    /// Number of records included, one per saved period.
    pub periods_count: u32,
}

/// Summary of one saved payroll period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPeriod {
    /// Start of the period.
    pub period_start: NaiveDate,
    /// End of the period.
    pub period_end: NaiveDate,
    /// Number of records (employees) in the period.
    pub total_employees: u32,
    /// Sum of the salaries in the period.
    pub total_payroll: Decimal,
    /// Bar revenue of the first record seen for the period.
    pub total_bar_amount: Decimal,
    /// Bar percentage of the first record seen for the period.
    pub bar_percentage: Decimal,
    /// Creation time of the first record seen for the period.
    pub created_at: DateTime<Utc>,
}

/// Optional constraints for loading history records.
///
/// An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Only records whose period starts on this date.
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    /// Only records whose period ends on this date.
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    /// Only records for this employee name.
    #[serde(default)]
    pub employee_name: Option<String>,
}

impl HistoryFilter {
    /// A filter matching exactly one period.
    pub fn for_period(period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            period_start: Some(period_start),
            period_end: Some(period_end),
            employee_name: None,
        }
    }

    /// Returns true if the record satisfies every set constraint.
    pub fn matches(&self, record: &PayrollHistoryRecord) -> bool {
        self.period_start.is_none_or(|start| record.period_start == start)
            && self.period_end.is_none_or(|end| record.period_end == end)
            && self
                .employee_name
                .as_deref()
                .is_none_or(|name| record.employee_name == name)
    }
}
