//! Payroll history aggregation.
//!
//! This module summarises persisted [`PayrollHistoryRecord`]s, either per
//! employee across all periods or per period across all employees. Output
//! follows the order in which each group is first seen in the input.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{EmployeeStats, PayrollHistoryRecord, SavedPeriod};

/// Sums history records per employee.
///
/// Records are grouped by `employee_name`, not `employee_id`: two employees
/// sharing a name collapse into one row, and a renamed employee splits into
/// two. Each record adds one to `periods_count`.
///
/// # Examples
///
/// ```
/// use bar_payroll::calculation::aggregate_by_employee;
///
/// assert!(aggregate_by_employee(&[]).is_empty());
/// ```
pub fn aggregate_by_employee(records: &[PayrollHistoryRecord]) -> Vec<EmployeeStats> {
    let mut stats: Vec<EmployeeStats> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let index = *index_by_name
            .entry(record.employee_name.as_str())
            .or_insert_with(|| {
                stats.push(EmployeeStats {
                    employee_name: record.employee_name.clone(),
                    total_shifts: 0,
                    total_internship_shifts: 0,
                    total_corkage_fee: Decimal::ZERO,
                    total_penalties: Decimal::ZERO,
                    total_bar_debt: Decimal::ZERO,
                    total_salary: Decimal::ZERO,
                    periods_count: 0,
                });
                stats.len() - 1
            });

        let entry = &mut stats[index];
        entry.total_shifts += u64::from(record.shifts);
        entry.total_internship_shifts += u64::from(record.internship_shifts);
        entry.total_corkage_fee = entry.total_corkage_fee.saturating_add(record.corkage_fee);
        entry.total_penalties = entry.total_penalties.saturating_add(record.penalties);
        entry.total_bar_debt = entry.total_bar_debt.saturating_add(record.bar_debt);
        entry.total_salary = entry.total_salary.saturating_add(record.total_salary);
        entry.periods_count += 1;
    }

    stats
}

/// Sums history records per saved period.
///
/// Records are grouped by `(period_start, period_end)`. `total_employees`
/// counts the records in the group and `total_payroll` sums their salaries.
/// The bar settings and creation time come from the first record seen for
/// the period; callers pass records newest first.
pub fn aggregate_by_period(records: &[PayrollHistoryRecord]) -> Vec<SavedPeriod> {
    let mut periods: Vec<SavedPeriod> = Vec::new();
    let mut index_by_key: HashMap<(NaiveDate, NaiveDate), usize> = HashMap::new();

    for record in records {
        let key = (record.period_start, record.period_end);
        let index = *index_by_key.entry(key).or_insert_with(|| {
            periods.push(SavedPeriod {
                period_start: record.period_start,
                period_end: record.period_end,
                total_employees: 0,
                total_payroll: Decimal::ZERO,
                total_bar_amount: record.total_bar_amount,
                bar_percentage: record.bar_percentage,
                created_at: record.created_at,
            });
            periods.len() - 1
        });

        let entry = &mut periods[index];
        entry.total_employees += 1;
        entry.total_payroll = entry.total_payroll.saturating_add(record.total_salary);
    }

    periods
}
